use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::StepDelay;

/// Repeating step schedule owned by the controller.
///
/// `start` and `stop` are synchronous; the tokio interval itself is created on
/// the first poll of [`tick`](Self::tick), anchored at the instant `start` was
/// called. Dropping the schedule is the cancellation, so a stopped timer can
/// never yield a stale tick.
#[derive(Debug)]
pub(crate) struct StepTimer {
    delay: StepDelay,
    schedule: Option<Schedule>,
}

#[derive(Debug)]
struct Schedule {
    armed_at: Instant,
    interval: Option<Interval>,
}

impl StepTimer {
    pub fn new(delay: StepDelay) -> Self {
        Self {
            delay,
            schedule: None,
        }
    }

    /// Start ticking every `delay`, first tick one period from now.
    /// Any active schedule is dropped first.
    pub fn start(&mut self) {
        self.stop();
        self.schedule = Some(Schedule {
            armed_at: Instant::now(),
            interval: None,
        });
    }

    pub fn stop(&mut self) {
        self.schedule = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.schedule.is_some()
    }

    #[inline]
    pub fn delay(&self) -> StepDelay {
        self.delay
    }

    /// Change the cadence. An active schedule is restarted, not caught up.
    pub fn set_delay(&mut self, delay: StepDelay) {
        self.delay = delay;
        if self.is_active() {
            self.start();
        }
    }

    /// Resolves on the next tick. Never resolves while the timer is stopped.
    ///
    /// Cancel safe: dropping the future does not lose or duplicate a tick.
    pub async fn tick(&mut self) {
        let Some(schedule) = self.schedule.as_mut() else {
            return std::future::pending().await;
        };
        let period = self.delay.as_duration();
        let first = schedule.armed_at + period;
        let interval = schedule.interval.get_or_insert_with(|| {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }
}
