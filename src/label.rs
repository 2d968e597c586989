use std::borrow::Cow;

pub trait Label {
    /// Returns a short, stable, human-readable label for this item.
    /// Used as a structured field in log records and for UI captions.
    fn label(&self) -> Cow<'static, str>;
}
