use std::{fmt, str::FromStr, time::Duration};

use crate::{Error, Result};

/// Cadence of the step timer. Always strictly positive.
///
/// ```rust
/// use tapestep::StepDelay;
///
/// let delay: StepDelay = " 250 ".parse().unwrap();
/// assert_eq!(delay.as_millis(), 250);
/// assert!("0".parse::<StepDelay>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Duration", into = "Duration"))]
pub struct StepDelay(Duration);

impl StepDelay {
    pub const DEFAULT_MILLIS: u64 = 90;

    pub fn new(duration: Duration) -> Result<Self> {
        if duration.is_zero() {
            return Err(Error::InvalidDelay(format!("{duration:?}")));
        }
        Ok(Self(duration))
    }

    pub fn from_millis(millis: u64) -> Result<Self> {
        if millis == 0 {
            return Err(Error::InvalidDelay(millis.to_string()));
        }
        Ok(Self(Duration::from_millis(millis)))
    }

    #[inline]
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    #[inline]
    pub fn as_millis(&self) -> u128 {
        self.0.as_millis()
    }
}

impl Default for StepDelay {
    fn default() -> Self {
        Self(Duration::from_millis(Self::DEFAULT_MILLIS))
    }
}

impl TryFrom<Duration> for StepDelay {
    type Error = Error;

    fn try_from(duration: Duration) -> Result<Self> {
        Self::new(duration)
    }
}

impl From<StepDelay> for Duration {
    fn from(delay: StepDelay) -> Self {
        delay.0
    }
}

impl FromStr for StepDelay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let millis: u64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidDelay(s.to_string()))?;
        Self::from_millis(millis)
    }
}

impl fmt::Display for StepDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}
