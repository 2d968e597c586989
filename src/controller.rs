use std::sync::Arc;

use uuid::Uuid;

use crate::{
    CellRef, Config, Error, ExecutionState, Halt, Intent, Interpreter, Label, Presenter, Result,
    StepDelay, StepEvent, StepHooks, StepOutcome,
    internal::{GateSignal, InputGate, StepTimer},
};

/// Builds a fresh interpreter for the given program text.
pub type Loader<I> = Box<dyn FnMut(&str) -> I + Send>;

/// The execution control state machine.
///
/// - `run()` / `first_step()` bootstrap a new session from the loaded program.
/// - `pause()`, `resume()`, `step()` and `stop()` drive a live session.
/// - `supply_input()` answers an outstanding input request.
/// - `set_delay()` changes the step cadence at any time.
/// - `tick()` is the timer callback; a [`Session`](crate::Session) calls it on
///   every tick of the step timer.
///
/// Intents that make no sense in the current state are ignored and logged,
/// except `supply_input`, which fails with [`Error::PreconditionViolation`].
///
/// See also: [`Interpreter`], [`Presenter`], [`ExecutionState`].
pub struct ExecutionController<I: Interpreter, P: Presenter> {
    config: Config,
    state: ExecutionState,
    loader: Loader<I>,
    interpreter: Option<I>,
    presenter: P,
    program: Arc<str>,
    optimize: bool,
    hooks: StepHooks,
    timer: StepTimer,
    gate: InputGate,
    session_id: Option<Uuid>,
    error_shown: bool,
}

impl<I: Interpreter, P: Presenter> ExecutionController<I, P> {
    /// Create a controller with the default configuration.
    pub fn new<F>(loader: F, presenter: P) -> Self
    where
        F: FnMut(&str) -> I + Send + 'static,
    {
        Self::with_config(Config::default(), loader, presenter)
    }

    /// Create a controller with the given configuration.
    ///
    /// `loader` is called at every `run` / `first_step` with the current
    /// program text; `presenter` receives every report of the controller.
    pub fn with_config<F>(config: Config, loader: F, presenter: P) -> Self
    where
        F: FnMut(&str) -> I + Send + 'static,
    {
        Self {
            state: ExecutionState::Idle,
            loader: Box::new(loader),
            interpreter: None,
            presenter,
            program: Arc::from(""),
            optimize: config.optimize,
            hooks: StepHooks::default(),
            timer: StepTimer::new(config.step_delay),
            gate: InputGate::default(),
            session_id: None,
            error_shown: false,
            config,
        }
    }

    /// Replace the program text used by the next `run` / `first_step`.
    /// A live session keeps running the program it was started with.
    pub fn load_program(&mut self, program: impl Into<Arc<str>>) {
        self.program = program.into();
    }

    /// Set the optimize flag passed to the interpreter on every following step.
    pub fn set_optimize(&mut self, optimize: bool) {
        self.optimize = optimize;
    }

    /// Start a new session and let the step timer drive it.
    ///
    /// Fails with [`Error::Syntax`] when the program does not parse; the
    /// message is shown and the current state (and session) is left untouched.
    pub fn run(&mut self) -> Result<()> {
        let interpreter = self.bootstrap()?;
        self.begin(interpreter);
        self.timer.start();
        self.transition(ExecutionState::Running);
        Ok(())
    }

    /// Start a new session, execute exactly one step inline and pause.
    pub fn first_step(&mut self) -> Result<StepOutcome> {
        let interpreter = self.bootstrap()?;
        self.begin(interpreter);
        self.transition(ExecutionState::SteppingOnce);
        let outcome = self.execute_step();
        if self.state == ExecutionState::SteppingOnce {
            self.transition(ExecutionState::Paused);
        }
        Ok(outcome)
    }

    /// Execute one step of a paused session. Returns `None` when ignored.
    pub fn step(&mut self) -> Option<StepOutcome> {
        if self.state != ExecutionState::Paused {
            self.ignore(&Intent::Step);
            return None;
        }
        Some(self.execute_step())
    }

    /// Stop the timer of a running session. Pausing a paused session is a no-op.
    pub fn pause(&mut self) {
        match self.state {
            ExecutionState::Running => {
                self.timer.stop();
                self.transition(ExecutionState::Paused);
            }
            ExecutionState::Paused => {}
            _ => self.ignore(&Intent::Pause),
        }
    }

    /// Let the timer drive a paused session again.
    pub fn resume(&mut self) {
        if self.state != ExecutionState::Paused {
            self.ignore(&Intent::Continue);
            return;
        }
        self.timer.start();
        self.transition(ExecutionState::Running);
    }

    /// End the live session, bringing tape and pointer back to the origin.
    ///
    /// A faulted controller is re-armed to [`ExecutionState::Idle`].
    pub fn stop(&mut self) {
        let to = match self.state {
            ExecutionState::Idle | ExecutionState::Stopped => {
                self.ignore(&Intent::Stop);
                return;
            }
            ExecutionState::Faulted => ExecutionState::Idle,
            _ => ExecutionState::Stopped,
        };
        self.timer.stop();
        self.gate.clear();
        if let Some(mut interpreter) = self.interpreter.take() {
            interpreter.reset();
        }
        tracing::info!(session = ?self.session_id, "Session stopped");
        self.transition(to);
    }

    /// Deliver input to the cell the interpreter is waiting on and resume running.
    pub fn supply_input(&mut self, value: &str) -> Result<()> {
        if self.state != ExecutionState::AwaitingInput {
            let err = Error::PreconditionViolation {
                intent: Intent::SupplyInput(value.to_string()),
                state: self.state,
            };
            tracing::warn!(error = %err, "Input rejected");
            return Err(err);
        }
        let Some(interpreter) = self.interpreter.as_mut() else {
            return Err(Error::NoPendingInput);
        };
        match self.gate.supply(value, interpreter)? {
            Ok(signal) => self.follow(signal),
            Err(halt) => {
                self.halt(halt);
            }
        }
        Ok(())
    }

    /// Change the step cadence. Zero is rejected and the previous delay kept.
    pub fn set_delay(&mut self, millis: u64) -> Result<()> {
        let delay = StepDelay::from_millis(millis)
            .inspect_err(|e| tracing::warn!(error = %e, "Step delay rejected"))?;
        self.timer.set_delay(delay);
        tracing::debug!(%delay, restarted = self.timer.is_active(), "Step delay changed");
        Ok(())
    }

    /// Timer callback: execute one step if the session is running.
    pub fn tick(&mut self) -> Option<StepOutcome> {
        if self.state != ExecutionState::Running {
            tracing::trace!(state = %self.state.label(), "Dropping tick");
            return None;
        }
        Some(self.execute_step())
    }

    /// Apply an [`Intent`] by calling the matching operation.
    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        tracing::trace!(intent = %intent.label(), state = %self.state.label(), "Dispatching");
        match intent {
            Intent::Load(program) => self.load_program(program),
            Intent::Run => self.run()?,
            Intent::FirstStep => {
                self.first_step()?;
            }
            Intent::Step => {
                self.step();
            }
            Intent::Pause => self.pause(),
            Intent::Continue => self.resume(),
            Intent::Stop => self.stop(),
            Intent::SupplyInput(value) => self.supply_input(&value)?,
            Intent::SetDelay(millis) => self.set_delay(millis)?,
            Intent::SetOptimize(optimize) => self.set_optimize(optimize),
        }
        Ok(())
    }

    /// The current state.
    #[inline]
    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// The current step cadence.
    #[inline]
    pub fn delay(&self) -> StepDelay {
        self.timer.delay()
    }

    /// Whether the step timer currently has an active schedule.
    #[inline]
    pub fn is_timer_active(&self) -> bool {
        self.timer.is_active()
    }

    /// The cell awaiting input, if any.
    #[inline]
    pub fn pending_input(&self) -> Option<CellRef> {
        self.gate.pending()
    }

    /// The interpreter of the current (or just completed / faulted) session.
    pub fn interpreter(&self) -> Option<&I> {
        self.interpreter.as_ref()
    }

    /// The presentation sink.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presentation sink.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Consume the controller and return the presentation sink.
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// The program text the next bootstrap will load.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The optimize flag passed to the interpreter.
    pub fn optimize(&self) -> bool {
        self.optimize
    }

    /// Identifier of the latest session, used to correlate log records.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// The configuration this controller was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) async fn next_tick(&mut self) {
        self.timer.tick().await
    }
}

impl<I: Interpreter, P: Presenter> ExecutionController<I, P> {
    fn bootstrap(&mut self) -> Result<I> {
        let interpreter = (self.loader)(&self.program);
        if let Err(e) = interpreter.check_syntax() {
            tracing::debug!(error = %e, state = %self.state.label(), "Program rejected");
            self.presenter.on_error(&e.0);
            return Err(e.into());
        }
        Ok(interpreter)
    }

    fn begin(&mut self, mut interpreter: I) {
        if self.state.has_session() {
            self.stop();
        }
        self.timer.stop();
        self.gate.clear();
        interpreter.reset();

        let id = Uuid::new_v4();
        tracing::info!(session = %id, delay = %self.timer.delay(), "Session started");
        self.session_id = Some(id);
        self.interpreter = Some(interpreter);
        self.error_shown = false;
        self.presenter.on_reset();
    }

    fn execute_step(&mut self) -> StepOutcome {
        let Some(interpreter) = self.interpreter.as_mut() else {
            return self.halt(Halt::Fault(crate::Fault::Internal(
                "step requested without a loaded interpreter".into(),
            )));
        };
        let result = interpreter.next(self.optimize, &mut self.hooks);

        let mut output = Vec::new();
        let mut requested = None;
        for event in self.hooks.take() {
            match event {
                StepEvent::Output(byte) => {
                    self.presenter.on_output(byte);
                    output.push(byte);
                }
                StepEvent::InstructionPointer(index) => {
                    self.presenter.on_instruction_pointer_moved(index)
                }
                StepEvent::InputRequested(cell) => requested = Some(cell),
            }
        }

        if let Err(halt) = result {
            return self.halt(halt);
        }
        if let Some(cell) = requested {
            self.await_input(cell);
            return StepOutcome::InputRequested(cell);
        }
        if output.is_empty() {
            StepOutcome::Advanced
        } else {
            StepOutcome::OutputProduced(output)
        }
    }

    fn await_input(&mut self, cell: CellRef) {
        let signal = self.gate.request(cell);
        self.follow(signal);
        self.presenter.on_input_requested(cell);
    }

    fn follow(&mut self, signal: GateSignal) {
        match signal {
            GateSignal::Blocked => {
                self.timer.stop();
                self.transition(ExecutionState::AwaitingInput);
            }
            GateSignal::Resume => {
                self.timer.start();
                self.transition(ExecutionState::Running);
            }
        }
    }

    fn halt(&mut self, halt: Halt) -> StepOutcome {
        self.timer.stop();
        self.gate.clear();
        match halt {
            Halt::Completion => {
                tracing::info!(session = ?self.session_id, "Program completed");
                self.transition(ExecutionState::Stopped);
                StepOutcome::Completed
            }
            Halt::Fault(fault) => {
                if fault.is_user_facing() {
                    tracing::info!(session = ?self.session_id, %fault, "Program fault");
                    self.show_error(fault.message());
                } else {
                    tracing::error!(
                        session = ?self.session_id,
                        error = %fault,
                        "Internal interpreter fault"
                    );
                }
                self.transition(ExecutionState::Faulted);
                StepOutcome::Fault(fault)
            }
        }
    }

    fn show_error(&mut self, message: &str) {
        if self.error_shown {
            return;
        }
        self.error_shown = true;
        self.presenter.on_error(message);
    }

    fn transition(&mut self, to: ExecutionState) {
        if self.state == to {
            return;
        }
        tracing::debug!(
            session = ?self.session_id,
            from = %self.state.label(),
            to = %to.label(),
            "State transition"
        );
        self.state = to;
        self.presenter.on_state_change(to);
    }

    fn ignore(&self, intent: &Intent) {
        tracing::debug!(intent = %intent.label(), state = %self.state.label(), "Ignoring intent");
    }
}
