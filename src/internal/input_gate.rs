use crate::{CellRef, Error, Halt, Interpreter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateSignal {
    /// Stepping must stay suspended until input arrives.
    Blocked,
    /// Input was delivered; stepping may resume.
    Resume,
}

/// Holds the single outstanding input request of a session.
#[derive(Debug, Default)]
pub(crate) struct InputGate {
    pending: Option<CellRef>,
}

impl InputGate {
    pub fn request(&mut self, cell: CellRef) -> GateSignal {
        if let Some(previous) = self.pending.replace(cell) {
            tracing::warn!(%previous, %cell, "Input request replaced an outstanding one");
        }
        GateSignal::Blocked
    }

    /// Deliver `value` to the waiting cell and close the gate.
    ///
    /// The request is consumed even when the interpreter rejects the value;
    /// the caller decides what the rejection means.
    pub fn supply<I: Interpreter + ?Sized>(
        &mut self,
        value: &str,
        interpreter: &mut I,
    ) -> Result<std::result::Result<GateSignal, Halt>, Error> {
        let cell = self.pending.take().ok_or(Error::NoPendingInput)?;
        Ok(interpreter.put(cell, value).map(|_| GateSignal::Resume))
    }

    #[inline]
    pub fn pending(&self) -> Option<CellRef> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
