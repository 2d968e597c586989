use crate::{CellRef, Fault};

/// Classification of a single interpreter step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    /// The step emitted one or more bytes, in order.
    OutputProduced(Vec<u8>),
    InputRequested(CellRef),
    Completed,
    Fault(Fault),
}

impl StepOutcome {
    /// Whether the step ended the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Completed | StepOutcome::Fault(_))
    }
}
