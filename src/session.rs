use tokio::{
    select,
    sync::{
        mpsc::{Receiver, Sender, channel},
        oneshot, watch,
    },
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{
    Error, ExecutionController, ExecutionState, Intent, Interpreter, Label, Presenter, Result,
};

struct Command {
    intent: Intent,
    reply: oneshot::Sender<Result<()>>,
}

/// Drives an [`ExecutionController`] in its own task.
///
/// The task multiplexes user intents with ticks of the step timer in a single
/// loop, so intents and steps never overlap. Intents are served before a tick
/// that became ready at the same time: once a `pause` or `stop` is
/// acknowledged, no further step runs.
pub struct Session<I: Interpreter, P: Presenter> {
    controller: ExecutionController<I, P>,
    receiver: Receiver<Command>,
    state: watch::Sender<ExecutionState>,
    cancel_token: CancellationToken,
}

impl<I: Interpreter + 'static, P: Presenter + 'static> Session<I, P> {
    /// Move the controller into a background task and return a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(controller: ExecutionController<I, P>) -> SessionHandle<I, P> {
        let (tx, rx) = channel(controller.config().channel_size.max(1));
        let (state_tx, state_rx) = watch::channel(controller.state());
        let cancel_token = CancellationToken::new();
        let session = Session {
            controller,
            receiver: rx,
            state: state_tx,
            cancel_token: cancel_token.clone(),
        };
        SessionHandle {
            sender: tx,
            state: state_rx,
            cancel_token,
            task: tokio::spawn(session.run()),
        }
    }

    async fn run(mut self) -> ExecutionController<I, P> {
        loop {
            select! {
                biased;
                _ = self.cancel_token.cancelled() => break,
                cmd = self.receiver.recv() => {
                    let Some(Command { intent, reply }) = cmd else {
                        break;
                    };
                    let label = intent.label();
                    let result = self.controller.dispatch(intent);
                    if let Err(e) = &result {
                        tracing::debug!(intent = %label, error = %e, "Intent failed");
                    }
                    self.publish_state();
                    let _ = reply.send(result);
                }
                _ = self.controller.next_tick() => {
                    self.controller.tick();
                    self.publish_state();
                }
            }
        }
        tracing::debug!(state = %self.controller.state().label(), "Session task finished");
        self.controller
    }

    fn publish_state(&self) {
        self.state.send_if_modified(|current| {
            let next = self.controller.state();
            let changed = *current != next;
            *current = next;
            changed
        });
    }
}

/// Client side of a running [`Session`].
///
/// Every intent method resolves once the intent has been fully applied, with
/// the same result the controller returned.
pub struct SessionHandle<I: Interpreter, P: Presenter> {
    sender: Sender<Command>,
    state: watch::Receiver<ExecutionState>,
    cancel_token: CancellationToken,
    task: JoinHandle<ExecutionController<I, P>>,
}

impl<I: Interpreter, P: Presenter> SessionHandle<I, P> {
    pub async fn send(&self, intent: Intent) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Command { intent, reply })
            .await
            .map_err(|_| Error::SessionClosed)?;
        response.await.map_err(|_| Error::SessionClosed)?
    }

    pub async fn load_program(&self, program: impl Into<String>) -> Result<()> {
        self.send(Intent::Load(program.into())).await
    }

    pub async fn run(&self) -> Result<()> {
        self.send(Intent::Run).await
    }

    pub async fn first_step(&self) -> Result<()> {
        self.send(Intent::FirstStep).await
    }

    pub async fn step(&self) -> Result<()> {
        self.send(Intent::Step).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(Intent::Pause).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.send(Intent::Continue).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.send(Intent::Stop).await
    }

    pub async fn supply_input(&self, value: impl Into<String>) -> Result<()> {
        self.send(Intent::SupplyInput(value.into())).await
    }

    pub async fn set_delay(&self, millis: u64) -> Result<()> {
        self.send(Intent::SetDelay(millis)).await
    }

    pub async fn set_optimize(&self, optimize: bool) -> Result<()> {
        self.send(Intent::SetOptimize(optimize)).await
    }

    /// The latest published state.
    pub fn state(&self) -> ExecutionState {
        *self.state.borrow()
    }

    /// Wait until the session reaches `target`.
    pub async fn wait_for(&mut self, target: ExecutionState) -> Result<()> {
        self.state
            .wait_for(|state| *state == target)
            .await
            .map(|_| ())
            .map_err(|_| Error::SessionClosed)
    }

    /// A receiver that observes every published state change.
    pub fn subscribe(&self) -> watch::Receiver<ExecutionState> {
        self.state.clone()
    }

    /// Stop the session task and hand the controller back.
    pub async fn shutdown(self) -> Result<ExecutionController<I, P>> {
        self.cancel_token.cancel();
        Ok(self.task.await?)
    }
}
