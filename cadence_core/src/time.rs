use std::{fmt::Display, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in physical time, represented as the duration since the UNIX epoch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ZERO: Self = Self(Duration::ZERO);

    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("system time before UNIX epoch"),
        )
    }

    pub fn checked_duration_since(&self, earlier: Self) -> Option<Duration> {
        self.0.checked_sub(earlier.0)
    }
}

impl From<Duration> for Timestamp {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl From<Timestamp> for Duration {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}

impl std::ops::Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs)
    }
}

/// A logical time: an offset from the start of execution paired with a
/// microstep used to order events that share the same offset.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    /// Offset from the origin of logical time.
    offset: Timestamp,
    /// Superdense time-step, incremented by zero-delay self-scheduling.
    microstep: u32,
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {})", self.offset.0, self.microstep)
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Tag {
    /// The tag of the very first event processed by a scheduler.
    pub const ZERO: Tag = Tag {
        offset: Timestamp(Duration::ZERO),
        microstep: 0,
    };

    pub fn new(offset: impl Into<Timestamp>, microstep: u32) -> Tag {
        Self {
            offset: offset.into(),
            microstep,
        }
    }

    /// The tag corresponding to an absolute physical instant, relative to `start_time`.
    pub fn from_physical_time(start_time: Timestamp, instant: Timestamp) -> Self {
        Self {
            offset: (instant - start_time).into(),
            microstep: 0,
        }
    }

    pub fn now(start_time: Timestamp) -> Self {
        Self::from_physical_time(start_time, Timestamp::now())
    }

    /// Resolve this tag into an absolute physical instant given the program's start time.
    pub fn to_logical_time(&self, start_time: Timestamp) -> Timestamp {
        start_time + Duration::from(self.offset)
    }

    pub fn offset(&self) -> Duration {
        self.offset.into()
    }

    pub fn microstep(&self) -> u32 {
        self.microstep
    }

    /// Produce the tag `total_delay` in the future from this one.
    ///
    /// A zero delay does not stand still: it advances the microstep instead of the
    /// offset, which is what lets a reaction that schedules an action with no
    /// additional delay observe its effect at a *later* point in the same instant
    /// rather than re-triggering itself immediately.
    pub fn delay(&self, total_delay: Duration) -> Self {
        if total_delay.is_zero() {
            Self {
                offset: self.offset,
                microstep: self.microstep + 1,
            }
        } else {
            Self {
                offset: self.offset + total_delay,
                microstep: 0,
            }
        }
    }
}
