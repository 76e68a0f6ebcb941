//! Weekly work schedules for collaborators.
//!
//! A collaborator has exactly one [`WorkScheduleDay`] per weekday. A fresh
//! schedule starts with every day disabled and is replaced wholesale when
//! edited; [`validate`] gates the replacement and reports every violation at
//! once so an edit form can show all errors in a single round trip.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::TimeOfDay;

/// The seven calendar weekdays, used as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    /// All weekdays in calendar order.
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    /// Storage string for the weekday.
    pub fn as_str(self) -> &'static str {
        match self {
            WeekDay::Monday => "monday",
            WeekDay::Tuesday => "tuesday",
            WeekDay::Wednesday => "wednesday",
            WeekDay::Thursday => "thursday",
            WeekDay::Friday => "friday",
            WeekDay::Saturday => "saturday",
            WeekDay::Sunday => "sunday",
        }
    }

    /// Position in calendar order, Monday = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The weekday a calendar date falls on.
    pub fn from_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for WeekDay {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => WeekDay::Monday,
            Weekday::Tue => WeekDay::Tuesday,
            Weekday::Wed => WeekDay::Wednesday,
            Weekday::Thu => WeekDay::Thursday,
            Weekday::Fri => WeekDay::Friday,
            Weekday::Sat => WeekDay::Saturday,
            Weekday::Sun => WeekDay::Sunday,
        }
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a weekday string is not one of the seven names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weekday '{0}'")]
pub struct WeekDayParseError(pub String);

impl FromStr for WeekDay {
    type Err = WeekDayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monday" => Ok(WeekDay::Monday),
            "tuesday" => Ok(WeekDay::Tuesday),
            "wednesday" => Ok(WeekDay::Wednesday),
            "thursday" => Ok(WeekDay::Thursday),
            "friday" => Ok(WeekDay::Friday),
            "saturday" => Ok(WeekDay::Saturday),
            "sunday" => Ok(WeekDay::Sunday),
            _ => Err(WeekDayParseError(s.to_string())),
        }
    }
}

/// One weekday's attendance window.
///
/// When `enabled` both times must be present with `start < end`; when
/// disabled the times are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkScheduleDay {
    pub day: WeekDay,
    pub enabled: bool,
    #[serde(default)]
    pub start: Option<TimeOfDay>,
    #[serde(default)]
    pub end: Option<TimeOfDay>,
}

impl WorkScheduleDay {
    /// A disabled day with cleared times.
    pub fn disabled(day: WeekDay) -> Self {
        Self {
            day,
            enabled: false,
            start: None,
            end: None,
        }
    }

    /// An enabled day working `start..end`.
    pub fn working(day: WeekDay, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            day,
            enabled: true,
            start: Some(start),
            end: Some(end),
        }
    }

    /// The attendance window, if the day is enabled and fully specified.
    pub fn window(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        if !self.enabled {
            return None;
        }
        Some((self.start?, self.end?))
    }
}

/// Error produced when a schedule entry list names the same weekday twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate schedule entry for {0}")]
pub struct DuplicateDayError(pub WeekDay);

/// A collaborator's full weekly schedule: one entry per weekday.
///
/// Serialized as a list of entries; deserialization accepts the entries in
/// any order, treats missing weekdays as disabled, and rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WorkScheduleDay>", into = "Vec<WorkScheduleDay>")]
pub struct WeeklySchedule {
    days: [WorkScheduleDay; 7],
}

impl WeeklySchedule {
    /// The schedule a freshly created collaborator starts with.
    pub fn all_disabled() -> Self {
        Self {
            days: WeekDay::ALL.map(WorkScheduleDay::disabled),
        }
    }

    /// Look up one weekday's entry.
    pub fn day(&self, day: WeekDay) -> &WorkScheduleDay {
        &self.days[day.index()]
    }

    /// Replace one weekday's entry.
    pub fn set_day(&mut self, entry: WorkScheduleDay) {
        self.days[entry.day.index()] = entry;
    }

    /// All seven entries in calendar order.
    pub fn days(&self) -> &[WorkScheduleDay; 7] {
        &self.days
    }

    /// The enabled entries, in calendar order.
    pub fn enabled_days(&self) -> impl Iterator<Item = &WorkScheduleDay> {
        self.days.iter().filter(|d| d.enabled)
    }
}

impl TryFrom<Vec<WorkScheduleDay>> for WeeklySchedule {
    type Error = DuplicateDayError;

    fn try_from(entries: Vec<WorkScheduleDay>) -> Result<Self, Self::Error> {
        let mut schedule = Self::all_disabled();
        let mut seen = [false; 7];
        for entry in entries {
            if seen[entry.day.index()] {
                return Err(DuplicateDayError(entry.day));
            }
            seen[entry.day.index()] = true;
            schedule.set_day(entry);
        }
        Ok(schedule)
    }
}

impl From<WeeklySchedule> for Vec<WorkScheduleDay> {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule.days.to_vec()
    }
}

/// Where a validation message points: the whole form or a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduleErrorKey {
    General,
    Day(WeekDay),
}

impl fmt::Display for ScheduleErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleErrorKey::General => f.write_str("general"),
            ScheduleErrorKey::Day(day) => f.write_str(day.as_str()),
        }
    }
}

/// Outcome of validating a schedule: empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleValidation {
    errors: BTreeMap<ScheduleErrorKey, String>,
}

impl ScheduleValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Per-field messages, ordered general-first then by weekday.
    pub fn errors(&self) -> &BTreeMap<ScheduleErrorKey, String> {
        &self.errors
    }
}

impl fmt::Display for ScheduleValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{key}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validate a submitted schedule before it is persisted.
///
/// Pure and not fail-fast: every violation is collected so the caller can
/// display all of them at once.
pub fn validate(schedule: &WeeklySchedule) -> ScheduleValidation {
    let mut errors = BTreeMap::new();

    if schedule.enabled_days().next().is_none() {
        errors.insert(
            ScheduleErrorKey::General,
            "configure at least one attendance day".to_string(),
        );
    }

    for day in schedule.days() {
        if !day.enabled {
            continue;
        }
        match (day.start, day.end) {
            (Some(start), Some(end)) if start < end => {}
            (Some(_), Some(_)) => {
                errors.insert(
                    ScheduleErrorKey::Day(day.day),
                    "start time must be before end time".to_string(),
                );
            }
            _ => {
                errors.insert(
                    ScheduleErrorKey::Day(day.day),
                    "start and end times are required".to_string(),
                );
            }
        }
    }

    ScheduleValidation { errors }
}
