use crate::{ExecutionState, Intent, SyntaxError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Intent '{intent}' is not allowed while {state}")]
    PreconditionViolation {
        intent: Intent,
        state: ExecutionState,
    },

    #[error("No input request is outstanding")]
    NoPendingInput,

    #[error("Step delay must be a positive number of milliseconds, got '{0}'")]
    InvalidDelay(String),

    #[error("The session has been shut down")]
    SessionClosed,

    #[error("Session task join error: {0}")]
    SessionJoinError(#[from] tokio::task::JoinError),
}
