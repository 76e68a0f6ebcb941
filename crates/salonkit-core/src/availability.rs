//! Point-in-time availability resolution for booking flows.
//!
//! [`resolve`] is the single entry point booking forms and the public
//! booking page go through. Precedence: a disabled weekday short-circuits
//! everything, an explicit block always wins over an enabled weekday, and
//! only then is the weekly window itself consulted. Double-booking against
//! confirmed appointments is checked by the appointment subsystem, in
//! addition to this resolver, never instead of it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::blocks::{is_date_fully_blocked, is_range_blocked, FullDayBlock, TimeBlock};
use crate::interval::{is_within, TimeOfDay};
use crate::schedule::{WeekDay, WeeklySchedule, WorkScheduleDay};

/// A candidate booking window for one collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub collaborator_id: String,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// The typed outcome of an availability query. Never an error: a
/// well-formed query always gets a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityVerdict {
    Available,
    /// The collaborator does not work on that weekday.
    WeeklyScheduleDisabled,
    /// A full-day block covers the date.
    DayFullyBlocked,
    /// The requested range falls outside the weekday's attendance window.
    OutsideWeeklyWindow,
    /// A time block overlaps the requested range.
    TimeRangeBlocked,
}

impl AvailabilityVerdict {
    pub fn is_available(self) -> bool {
        matches!(self, AvailabilityVerdict::Available)
    }
}

impl std::fmt::Display for AvailabilityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            AvailabilityVerdict::Available => "available",
            AvailabilityVerdict::WeeklyScheduleDisabled => {
                "the collaborator does not work on this weekday"
            }
            AvailabilityVerdict::DayFullyBlocked => "the collaborator is absent on this date",
            AvailabilityVerdict::OutsideWeeklyWindow => {
                "the requested time is outside the collaborator's working hours"
            }
            AvailabilityVerdict::TimeRangeBlocked => "the requested time range is blocked",
        };
        f.write_str(text)
    }
}

/// Decide whether the queried window is bookable.
///
/// First matching rule wins:
/// 1. weekday disabled
/// 2. date covered by a full-day block (checked even for enabled weekdays)
/// 3. range outside the weekly window (window end inclusive)
/// 4. range overlapped by a time block (half-open)
/// 5. available
pub fn resolve(
    query: &AvailabilityQuery,
    schedule: &WeeklySchedule,
    full_day_blocks: &[FullDayBlock],
    time_blocks: &[TimeBlock],
) -> AvailabilityVerdict {
    let day = schedule.day(WeekDay::from_date(query.date));
    let Some((window_start, window_end)) = day.window() else {
        return AvailabilityVerdict::WeeklyScheduleDisabled;
    };
    if is_date_fully_blocked(full_day_blocks, query.date) {
        return AvailabilityVerdict::DayFullyBlocked;
    }
    if !is_within(query.start, query.end, window_start, window_end) {
        return AvailabilityVerdict::OutsideWeeklyWindow;
    }
    if is_range_blocked(time_blocks, query.date, query.start, query.end) {
        return AvailabilityVerdict::TimeRangeBlocked;
    }
    AvailabilityVerdict::Available
}

/// A bookable sub-window of one day's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl FreeWindow {
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Whether a booking of the given length fits in this window.
    pub fn can_fit(&self, minutes: u16) -> bool {
        self.duration_minutes() >= minutes
    }

    /// Candidate booking start times on a fixed grid.
    ///
    /// Starts at the window start and steps by `grid_minutes`, keeping every
    /// start whose `duration_minutes`-long booking still ends inside the
    /// window.
    pub fn slot_starts(&self, grid_minutes: u16, duration_minutes: u16) -> Vec<TimeOfDay> {
        let mut starts = Vec::new();
        if grid_minutes == 0 || duration_minutes == 0 {
            return starts;
        }
        // Widen before adding: a caller-supplied duration near u16::MAX must
        // not overflow the bound check.
        let window_end = u32::from(self.end.minutes());
        let duration = u32::from(duration_minutes);
        let mut at = u32::from(self.start.minutes());
        while at + duration <= window_end {
            if let Some(time) = TimeOfDay::from_minutes(at as u16) {
                starts.push(time);
            }
            at += u32::from(grid_minutes);
        }
        starts
    }
}

/// The remaining bookable windows of one date, ascending.
///
/// Empty when the weekday is disabled or a full-day block covers the date.
/// Otherwise the weekly window minus that date's time blocks, with blocks
/// clamped to the window and empty leftovers dropped.
pub fn free_windows(
    day: &WorkScheduleDay,
    full_day_blocks: &[FullDayBlock],
    time_blocks: &[TimeBlock],
    date: NaiveDate,
) -> Vec<FreeWindow> {
    let Some((window_start, window_end)) = day.window() else {
        return Vec::new();
    };
    if is_date_fully_blocked(full_day_blocks, date) {
        return Vec::new();
    }

    let mut busy: Vec<(TimeOfDay, TimeOfDay)> = time_blocks
        .iter()
        .filter(|b| b.block_date == date && b.overlaps_range(window_start, window_end))
        .map(|b| (b.start.max(window_start), b.end.min(window_end)))
        .collect();
    busy.sort();

    let mut windows = Vec::new();
    let mut cursor = window_start;
    for (busy_start, busy_end) in busy {
        if busy_start > cursor {
            windows.push(FreeWindow {
                start: cursor,
                end: busy_start,
            });
        }
        cursor = cursor.max(busy_end);
    }
    if cursor < window_end {
        windows.push(FreeWindow {
            start: cursor,
            end: window_end,
        });
    }
    windows
}
