//! Tapestep — execution control for tape-interpreter step debuggers
//!
//! The crate decides, at any moment, whether an interpreter is idle, running,
//! paused, waiting for input or terminated, and drives its single-step
//! operation from a cancellable repeating timer. Program semantics live behind
//! the [`Interpreter`] trait; rendering lives behind the [`Presenter`] trait.
//!
//! Use [`ExecutionController`] directly when you own the event loop, or hand it
//! to [`Session::spawn`] to get a task that multiplexes intents and timer ticks.

mod config;
mod controller;
mod delay;
mod error;
mod intent;
mod interpreter;
mod label;
mod outcome;
mod presenter;
mod session;
mod state;

mod internal;

pub use config::Config;
pub use controller::{ExecutionController, Loader};
pub use delay::StepDelay;
pub use error::Error;
pub use intent::Intent;
pub use interpreter::{CellRef, Fault, Halt, Interpreter, StepEvent, StepHooks, SyntaxError};
pub use label::Label;
pub use outcome::StepOutcome;
pub use presenter::{Presenter, PresenterEvent};
pub use session::{Session, SessionHandle};
pub use state::{Controls, ExecutionState};

pub type Result<T = ()> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::controller::ExecutionController;
    pub use crate::error::Error as TapestepError;
    pub use crate::intent::Intent;
    pub use crate::interpreter::{CellRef, Fault, Halt, Interpreter, StepHooks, SyntaxError};
    pub use crate::presenter::Presenter;
    pub use crate::session::{Session, SessionHandle};
    pub use crate::state::ExecutionState;
}
