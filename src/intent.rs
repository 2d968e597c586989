use std::{borrow::Cow, fmt};

use crate::Label;

/// A user request coming from the presentation layer.
///
/// Intents are plain values so they can travel through a channel to a
/// [`Session`](crate::Session) or be applied directly with
/// [`ExecutionController::dispatch`](crate::ExecutionController::dispatch).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Replace the program text used by the next bootstrap.
    Load(String),
    Run,
    FirstStep,
    Step,
    Pause,
    Continue,
    Stop,
    SupplyInput(String),
    /// New step cadence in milliseconds.
    SetDelay(u64),
    SetOptimize(bool),
}

impl Label for Intent {
    fn label(&self) -> Cow<'static, str> {
        let label = match self {
            Intent::Load(_) => "load",
            Intent::Run => "run",
            Intent::FirstStep => "first-step",
            Intent::Step => "step",
            Intent::Pause => "pause",
            Intent::Continue => "continue",
            Intent::Stop => "stop",
            Intent::SupplyInput(_) => "supply-input",
            Intent::SetDelay(_) => "set-delay",
            Intent::SetOptimize(_) => "set-optimize",
        };
        Cow::Borrowed(label)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
