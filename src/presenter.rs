use tokio::sync::mpsc::UnboundedSender;

use crate::{CellRef, ExecutionState};

/// Sink for everything the controller reports to the presentation layer.
///
/// Every hook has a no-op default; implement the ones your front end renders.
/// `()` is a presenter that discards everything.
pub trait Presenter: Send {
    /// Fired on every state transition. Use [`ExecutionState::controls`] to
    /// toggle button affordances.
    fn on_state_change(&mut self, state: ExecutionState) {
        let _s = state;
    }

    fn on_output(&mut self, byte: u8) {
        let _b = byte;
    }

    fn on_instruction_pointer_moved(&mut self, index: usize) {
        let _i = index;
    }

    fn on_input_requested(&mut self, cell: CellRef) {
        let _c = cell;
    }

    /// A syntax error or a user-facing program fault. At most one per session.
    fn on_error(&mut self, message: &str) {
        let _m = message;
    }

    /// A fresh session was bootstrapped: clear output, error and preview displays.
    fn on_reset(&mut self) {}
}

impl Presenter for () {}

/// Owned form of the [`Presenter`] hooks, for front ends that consume them
/// from a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    StateChanged(ExecutionState),
    Output(u8),
    InstructionPointerMoved(usize),
    InputRequested(CellRef),
    Error(String),
    Reset,
}

impl Presenter for UnboundedSender<PresenterEvent> {
    fn on_state_change(&mut self, state: ExecutionState) {
        let _ = self.send(PresenterEvent::StateChanged(state));
    }

    fn on_output(&mut self, byte: u8) {
        let _ = self.send(PresenterEvent::Output(byte));
    }

    fn on_instruction_pointer_moved(&mut self, index: usize) {
        let _ = self.send(PresenterEvent::InstructionPointerMoved(index));
    }

    fn on_input_requested(&mut self, cell: CellRef) {
        let _ = self.send(PresenterEvent::InputRequested(cell));
    }

    fn on_error(&mut self, message: &str) {
        let _ = self.send(PresenterEvent::Error(message.to_string()));
    }

    fn on_reset(&mut self) {
        let _ = self.send(PresenterEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn channel_presenter_forwards_hooks_in_order() {
        let (mut tx, mut rx) = mpsc::unbounded_channel::<PresenterEvent>();
        tx.on_reset();
        tx.on_state_change(ExecutionState::Running);
        tx.on_output(b'h');
        tx.on_error("boom");

        assert_eq!(rx.try_recv().unwrap(), PresenterEvent::Reset);
        assert_eq!(
            rx.try_recv().unwrap(),
            PresenterEvent::StateChanged(ExecutionState::Running)
        );
        assert_eq!(rx.try_recv().unwrap(), PresenterEvent::Output(b'h'));
        assert_eq!(rx.try_recv().unwrap(), PresenterEvent::Error("boom".into()));
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (mut tx, rx) = mpsc::unbounded_channel::<PresenterEvent>();
        drop(rx);
        tx.on_output(0);
    }
}
