use std::{borrow::Cow, fmt};

use crate::Label;

/// Where a debugging session currently stands.
///
/// Exactly one value holds at any time. A controller starts in [`Idle`](Self::Idle);
/// [`Stopped`](Self::Stopped) and [`Faulted`](Self::Faulted) are terminal for the
/// session that reached them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionState {
    /// No session has been started yet, or a faulted session was re-armed.
    #[default]
    Idle,
    /// The step timer is driving the interpreter.
    Running,
    /// A `first_step` bootstrap is executing its single inline step.
    SteppingOnce,
    /// A session is alive but the timer is stopped.
    Paused,
    /// The interpreter asked for input; stepping is suspended until it is supplied.
    AwaitingInput,
    /// The session ended, either on request or because the program completed.
    Stopped,
    /// The session ended on a runtime fault.
    Faulted,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Stopped | ExecutionState::Faulted)
    }

    /// Whether an interpreter session is alive (started and not yet terminated).
    pub fn has_session(&self) -> bool {
        matches!(
            self,
            ExecutionState::Running
                | ExecutionState::SteppingOnce
                | ExecutionState::Paused
                | ExecutionState::AwaitingInput
        )
    }

    /// Controls the presentation layer should offer in this state.
    pub fn controls(&self) -> Controls {
        use ExecutionState::*;
        let mut c = Controls::default();
        match self {
            Idle | Stopped => {
                c.run = true;
                c.first_step = true;
                c.editor = true;
            }
            Running => {
                c.pause = true;
                c.stop = true;
            }
            SteppingOnce | Paused => {
                c.step = true;
                c.resume = true;
                c.stop = true;
            }
            AwaitingInput => {
                c.input = true;
                c.stop = true;
            }
            Faulted => {
                c.run = true;
                c.first_step = true;
                c.stop = true;
                c.editor = true;
            }
        }
        c
    }
}

impl Label for ExecutionState {
    fn label(&self) -> Cow<'static, str> {
        let label = match self {
            ExecutionState::Idle => "idle",
            ExecutionState::Running => "running",
            ExecutionState::SteppingOnce => "stepping-once",
            ExecutionState::Paused => "paused",
            ExecutionState::AwaitingInput => "awaiting-input",
            ExecutionState::Stopped => "stopped",
            ExecutionState::Faulted => "faulted",
        };
        Cow::Borrowed(label)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Button affordances for a given [`ExecutionState`].
///
/// `editor` is true when the program source should be editable; otherwise the
/// instruction preview (with the current instruction highlighted) is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Controls {
    pub run: bool,
    pub first_step: bool,
    pub step: bool,
    pub pause: bool,
    pub resume: bool,
    pub stop: bool,
    pub input: bool,
    pub editor: bool,
}
