#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tapestep::{
    CellRef, Config, ExecutionController, ExecutionState, Fault, Halt, Interpreter, Presenter,
    StepHooks, SyntaxError,
};

pub const TAPE_LEN: usize = 8;

/// What the scripted interpreter does on each call to `next`.
#[derive(Debug, Clone)]
pub enum Scripted {
    Advance,
    Output(u8),
    Input(CellRef),
    Complete,
    ProgramFault(&'static str),
    InternalFault(&'static str),
}

/// Tape, pointer and counters shared between the test and the interpreter.
#[derive(Debug, Default)]
pub struct Machine {
    pub tape: [u8; TAPE_LEN],
    pub pointer: usize,
    pub steps: usize,
    pub resets: usize,
    pub loads: usize,
    pub last_optimize: Option<bool>,
}

impl Machine {
    pub fn at_origin(&self) -> bool {
        self.pointer == 0 && self.tape.iter().all(|c| *c == 0)
    }
}

pub type SharedMachine = Arc<Mutex<Machine>>;

pub struct ScriptedInterpreter {
    program: String,
    script: Vec<Scripted>,
    cursor: usize,
    machine: SharedMachine,
}

impl Interpreter for ScriptedInterpreter {
    fn check_syntax(&self) -> Result<(), SyntaxError> {
        if self.program.contains("#bad") {
            return Err(SyntaxError("unexpected '#bad' at 0".into()));
        }
        Ok(())
    }

    fn next(&mut self, optimize: bool, hooks: &mut StepHooks) -> Result<(), Halt> {
        let action = self
            .script
            .get(self.cursor)
            .cloned()
            .unwrap_or(Scripted::Advance);
        let index = self.cursor;
        self.cursor += 1;

        let mut machine = self.machine.lock().unwrap();
        machine.steps += 1;
        machine.last_optimize = Some(optimize);
        hooks.instruction(index);

        match action {
            Scripted::Advance => {
                let p = machine.pointer;
                machine.tape[p] = machine.tape[p].wrapping_add(1);
                machine.pointer = (p + 1) % TAPE_LEN;
                Ok(())
            }
            Scripted::Output(byte) => {
                hooks.output(byte);
                Ok(())
            }
            Scripted::Input(cell) => {
                hooks.request_input(cell);
                Ok(())
            }
            Scripted::Complete => Err(Halt::Completion),
            Scripted::ProgramFault(msg) => Err(Fault::Program(msg.into()).into()),
            Scripted::InternalFault(msg) => Err(Fault::Internal(msg.into()).into()),
        }
    }

    fn put(&mut self, cell: CellRef, value: &str) -> Result<(), Halt> {
        let byte: u8 = value
            .trim()
            .parse()
            .map_err(|_| Fault::Program(format!("invalid input '{value}'")))?;
        let mut machine = self.machine.lock().unwrap();
        let slot = machine
            .tape
            .get_mut(cell.0)
            .ok_or_else(|| Fault::Internal(format!("cell {cell} out of range")))?;
        *slot = byte;
        Ok(())
    }

    fn reset(&mut self) {
        let mut machine = self.machine.lock().unwrap();
        machine.tape = [0; TAPE_LEN];
        machine.pointer = 0;
        machine.resets += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub states: Vec<ExecutionState>,
    pub output: Vec<u8>,
    pub instructions: Vec<usize>,
    pub input_requests: Vec<CellRef>,
    pub errors: Vec<String>,
    pub resets: usize,
}

impl Presenter for RecordingPresenter {
    fn on_state_change(&mut self, state: ExecutionState) {
        self.states.push(state);
    }

    fn on_output(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn on_instruction_pointer_moved(&mut self, index: usize) {
        self.instructions.push(index);
    }

    fn on_input_requested(&mut self, cell: CellRef) {
        self.input_requests.push(cell);
    }

    fn on_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn on_reset(&mut self) {
        self.resets += 1;
    }
}

pub type TestController = ExecutionController<ScriptedInterpreter, RecordingPresenter>;

pub fn controller(script: Vec<Scripted>) -> (TestController, SharedMachine) {
    controller_with_config(Config::default(), script)
}

pub fn controller_with_config(
    config: Config,
    script: Vec<Scripted>,
) -> (TestController, SharedMachine) {
    let machine = SharedMachine::default();
    let shared = machine.clone();
    let loader = move |program: &str| {
        shared.lock().unwrap().loads += 1;
        ScriptedInterpreter {
            program: program.to_string(),
            script: script.clone(),
            cursor: 0,
            machine: shared.clone(),
        }
    };
    let mut controller =
        ExecutionController::with_config(config, loader, RecordingPresenter::default());
    controller.load_program("+>+.");
    (controller, machine)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
