//! Minute-granularity clock times and same-day interval arithmetic.
//!
//! All comparisons happen on integer minutes since midnight. No floats and
//! no date objects are involved for same-day checks, so there is no
//! timezone drift to worry about.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a clock-time string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid clock time '{0}', expected HH:MM")]
pub struct TimeParseError(pub String);

/// A clock time with minute precision, stored as minutes since midnight.
///
/// A constructed value is always within `00:00..=23:59`; malformed input is
/// rejected at parse time and never reaches the comparison functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

const MINUTES_PER_DAY: u16 = 24 * 60;

impl TimeOfDay {
    /// Build from minutes since midnight. Returns `None` past `23:59`.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    /// Build from an hour/minute pair.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Parse an `"HH:MM"` string (a single-digit hour is accepted).
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let err = || TimeParseError(s.to_string());
        let (hh, mm) = s.split_once(':').ok_or_else(err)?;
        if hh.is_empty() || hh.len() > 2 || mm.len() != 2 {
            return Err(err());
        }
        let hour: u16 = hh.parse().map_err(|_| err())?;
        let minute: u16 = mm.parse().map_err(|_| err())?;
        Self::new(hour, minute).ok_or_else(err)
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Shift forward by `minutes`, or `None` if that leaves the day.
    pub fn plus_minutes(self, minutes: u16) -> Option<Self> {
        Self::from_minutes(self.0.checked_add(minutes)?)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Half-open overlap test: `[a_start, a_end)` intersects `[b_start, b_end)`.
///
/// Touching intervals (one ends exactly where the other starts) do NOT
/// overlap.
pub fn overlaps(a_start: TimeOfDay, a_end: TimeOfDay, b_start: TimeOfDay, b_end: TimeOfDay) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether the candidate range fits inside the window.
///
/// The window end is inclusive: a booking that ends exactly at the window
/// end is accepted (if the day ends at 19:00 you can still book until
/// 19:00).
pub fn is_within(
    candidate_start: TimeOfDay,
    candidate_end: TimeOfDay,
    window_start: TimeOfDay,
    window_end: TimeOfDay,
) -> bool {
    window_start <= candidate_start && candidate_end <= window_end
}
