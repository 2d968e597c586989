use std::fmt;

/// Index of a tape cell, as handed out by the interpreter when it asks for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRef(pub usize);

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The program text does not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SyntaxError(pub String);

/// A runtime fault raised by an interpreter step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// A program-level error (malformed instruction, out-of-range operation).
    /// The message is shown to the user verbatim.
    #[error("{0}")]
    Program(String),

    /// Anything else. Logged for developers, never shown to the user.
    #[error("Internal interpreter fault: {0}")]
    Internal(String),
}

impl Fault {
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Fault::Program(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Fault::Program(msg) | Fault::Internal(msg) => msg,
        }
    }
}

/// Why a step did not simply advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// The program ran to its end. Not an error.
    Completion,
    Fault(Fault),
}

impl From<Fault> for Halt {
    fn from(fault: Fault) -> Self {
        Halt::Fault(fault)
    }
}

/// Something an interpreter reported while executing a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Output(u8),
    InstructionPointer(usize),
    InputRequested(CellRef),
}

/// Collects the side effects of a single [`Interpreter::next`] call.
///
/// The controller hands a cleared instance to every step and forwards the
/// recorded events to the presentation layer in order once the step returns.
#[derive(Debug, Default)]
pub struct StepHooks {
    events: Vec<StepEvent>,
    input_requested: bool,
}

impl StepHooks {
    pub fn output(&mut self, byte: u8) {
        self.events.push(StepEvent::Output(byte));
    }

    pub fn instruction(&mut self, index: usize) {
        self.events.push(StepEvent::InstructionPointer(index));
    }

    /// Ask for input to be written into `cell`. Only the first request of a step counts.
    pub fn request_input(&mut self, cell: CellRef) {
        if self.input_requested {
            tracing::warn!(%cell, "Input already requested during this step, ignoring");
            return;
        }
        self.input_requested = true;
        self.events.push(StepEvent::InputRequested(cell));
    }

    pub fn events(&self) -> &[StepEvent] {
        &self.events
    }

    pub(crate) fn take(&mut self) -> Vec<StepEvent> {
        self.input_requested = false;
        std::mem::take(&mut self.events)
    }
}

/// The program executor driven by the controller.
///
/// One instance is built per session from the current program text. It owns
/// the tape and the pointer; the controller only asks it to step, to accept
/// input and to reset its memory.
pub trait Interpreter: Send {
    /// Validate the program without side effects.
    fn check_syntax(&self) -> Result<(), SyntaxError>;

    /// Execute one unit of work.
    ///
    /// Output, instruction-pointer moves and at most one input request are
    /// reported through `hooks`. Returning [`Halt::Completion`] ends the session
    /// normally; [`Halt::Fault`] ends it with a fault.
    fn next(&mut self, optimize: bool, hooks: &mut StepHooks) -> Result<(), Halt>;

    /// Write user-supplied input into `cell`.
    fn put(&mut self, cell: CellRef, value: &str) -> Result<(), Halt>;

    /// Bring the tape and the pointer back to their origin.
    fn reset(&mut self);
}

impl<I: Interpreter + ?Sized> Interpreter for Box<I> {
    fn check_syntax(&self) -> Result<(), SyntaxError> {
        (**self).check_syntax()
    }

    fn next(&mut self, optimize: bool, hooks: &mut StepHooks) -> Result<(), Halt> {
        (**self).next(optimize, hooks)
    }

    fn put(&mut self, cell: CellRef, value: &str) -> Result<(), Halt> {
        (**self).put(cell, value)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
