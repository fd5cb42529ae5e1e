use std::fmt;
use std::time::Duration;

/// Record time to live, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeToLive(u32);

impl TimeToLive {
    pub const MAX: TimeToLive = TimeToLive(u32::MAX);
    pub const ZERO: TimeToLive = TimeToLive(0u32);

    /// TTL applied to records that carry none and follow no `$TTL` directive.
    pub const DEFAULT: TimeToLive = TimeToLive(3600);

    pub fn from_secs(secs: u32) -> Self {
        TimeToLive(secs)
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimeToLive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TimeToLive {
    fn from(value: u32) -> Self {
        TimeToLive(value)
    }
}

impl From<TimeToLive> for u32 {
    fn from(value: TimeToLive) -> Self {
        value.0
    }
}

/// Durations beyond `u32::MAX` seconds saturate.
impl From<Duration> for TimeToLive {
    fn from(value: Duration) -> Self {
        TimeToLive(value.as_secs().try_into().unwrap_or(u32::MAX))
    }
}

impl From<TimeToLive> for Duration {
    fn from(value: TimeToLive) -> Self {
        Duration::from_secs(value.0 as u64)
    }
}
