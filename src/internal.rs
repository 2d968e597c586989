mod input_gate;
mod step_timer;

pub(crate) use input_gate::{GateSignal, InputGate};
pub(crate) use step_timer::StepTimer;
