//! SOA serial number policies.
//!
//! Every policy computes a candidate serial and then applies the same
//! guard: when the candidate is not strictly after the old serial under
//! RFC 1982 arithmetic, the result is `old + 1` instead. The requested
//! offset or value is discarded in that case.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike as _, Local};
use serde::Deserialize;
use tracing::debug;

use crate::error::SerialPolicyError;
use crate::rr::SerialNumber;

/// How to compute the new serial of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum SerialPolicy {
    /// Add a signed offset to the old serial.
    Offset(i32),
    /// Use an explicit value.
    Set(u32),
    /// `YYYYMMDD` of the current local date followed by a counter of `00`.
    DateCounter,
    /// Seconds since the Unix epoch, truncated to 32 bits.
    UnixTime,
}

impl SerialPolicy {
    /// Compute the next serial using the local clock.
    pub fn next_serial(&self, old: SerialNumber) -> SerialNumber {
        self.next_serial_at(old, Local::now())
    }

    /// Compute the next serial as if the current time were `now`.
    pub fn next_serial_at(&self, old: SerialNumber, now: DateTime<Local>) -> SerialNumber {
        let candidate = match *self {
            SerialPolicy::Offset(delta) => Some(old.offset(delta)),
            SerialPolicy::Set(value) => Some(SerialNumber::from(value)),
            SerialPolicy::DateCounter => date_counter(now),
            SerialPolicy::UnixTime => Some(SerialNumber::from(now.timestamp() as u32)),
        };

        match candidate {
            Some(serial) if serial.is_after(&old) => serial,
            _ => {
                debug!(policy = %self, %old, ?candidate, "serial would not increase, using old + 1");
                old.next()
            }
        }
    }
}

/// `YYYYMMDD00` for the given date, if it fits in 32 bits.
fn date_counter(now: DateTime<Local>) -> Option<SerialNumber> {
    let date = now.date_naive();
    let year = u64::try_from(date.year()).ok()?;
    let value = (year * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())) * 100;
    u32::try_from(value).ok().map(SerialNumber::from)
}

impl fmt::Display for SerialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialPolicy::Offset(delta) => write!(f, "{delta:+}"),
            SerialPolicy::Set(value) => write!(f, "{value}"),
            SerialPolicy::DateCounter => f.write_str("YYYYMMDDxx"),
            SerialPolicy::UnixTime => f.write_str("unixtime"),
        }
    }
}

impl FromStr for SerialPolicy {
    type Err = SerialPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SerialPolicyError(s.to_owned());

        if s.starts_with(['+', '-']) {
            return s.parse().map(SerialPolicy::Offset).map_err(|_| invalid());
        }

        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s.parse().map(SerialPolicy::Set).map_err(|_| invalid());
        }

        if s.eq_ignore_ascii_case("YYYYMMDDxx") {
            Ok(SerialPolicy::DateCounter)
        } else if s.eq_ignore_ascii_case("unixtime") {
            Ok(SerialPolicy::UnixTime)
        } else {
            Err(invalid())
        }
    }
}

impl TryFrom<String> for SerialPolicy {
    type Error = SerialPolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
