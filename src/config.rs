use crate::StepDelay;

/// Controller and session configuration.
///
/// Use the builder methods to customize, or [`Default`] for the stock setup.
///
/// # Examples
///
/// ```rust
/// use tapestep::{Config, StepDelay};
///
/// let config = Config::default()
///     .with_step_delay(StepDelay::from_millis(200).unwrap())
///     .with_optimize(true);
/// assert_eq!(config.step_delay.as_millis(), 200);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Initial cadence of the step timer.
    /// Default: 90 ms
    pub step_delay: StepDelay,

    /// Initial value of the optimize flag passed to every interpreter step.
    /// Default: false
    pub optimize: bool,

    /// Capacity of the intent channel of a [`Session`](crate::Session).
    /// A value of zero is treated as one.
    /// Default: 32
    pub channel_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            step_delay: StepDelay::default(),
            optimize: false,
            channel_size: 32,
        }
    }
}

impl Config {
    pub fn with_step_delay(mut self, delay: StepDelay) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Set the intent channel capacity. Senders wait when it is full.
    /// Zero is raised to one.
    pub fn with_channel_size(mut self, size: usize) -> Self {
        self.channel_size = size.max(1);
        self
    }
}
