//! Absence blocks and the guards that keep them conflict-free.
//!
//! Two kinds of block exist: [`FullDayBlock`] marks an inclusive range of
//! whole dates unavailable, [`TimeBlock`] marks a time range on a single
//! date. Time blocks for the same collaborator and date must never overlap;
//! [`check_time_block`] is the policy that enforces it and is re-run by the
//! storage layer inside the insert transaction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::interval::{overlaps, TimeOfDay};

/// An inclusive date range during which a collaborator is entirely
/// unavailable, overriding the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDayBlock {
    pub id: String,
    pub collaborator_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl FullDayBlock {
    pub fn new(
        collaborator_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            collaborator_id: collaborator_id.into(),
            start_date,
            end_date,
            reason: reason.into(),
        }
    }

    /// Whether `date` falls inside the blocked range (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A single-date time range during which a collaborator is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: String,
    pub collaborator_id: String,
    pub block_date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub reason: Option<String>,
}

impl TimeBlock {
    pub fn new(
        collaborator_id: impl Into<String>,
        block_date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            collaborator_id: collaborator_id.into(),
            block_date,
            start,
            end,
            reason,
        }
    }

    /// Half-open overlap against a candidate range on the same date.
    pub fn overlaps_range(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        overlaps(self.start, self.end, start, end)
    }
}

/// Why a block creation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("block end time must be after its start time")]
    EmptyRange,

    #[error("block end date must not precede its start date")]
    InvertedDateRange,

    /// The candidate clashes with an existing time block; the create is
    /// aborted and nothing is written.
    #[error("time range clashes with an existing block from {start} to {end}")]
    Overlap {
        existing_id: String,
        start: TimeOfDay,
        end: TimeOfDay,
    },
}

/// Guard for creating a full-day block.
///
/// Only the structural invariant is checked. Overlapping full-day blocks
/// are allowed: `is_date_fully_blocked` is an existential scan, so stacked
/// blocks behave as their union at query time and stay individually
/// deletable.
pub fn check_full_day_block(candidate: &FullDayBlock) -> Result<(), BlockError> {
    if candidate.end_date < candidate.start_date {
        return Err(BlockError::InvertedDateRange);
    }
    Ok(())
}

/// Guard for creating a time block against the blocks already held for the
/// same collaborator.
///
/// Rejects an empty range, then rejects the first existing block on the
/// same date whose `[start, end)` interval overlaps the candidate's.
pub fn check_time_block(existing: &[TimeBlock], candidate: &TimeBlock) -> Result<(), BlockError> {
    if candidate.start >= candidate.end {
        return Err(BlockError::EmptyRange);
    }
    for block in existing {
        if block.collaborator_id != candidate.collaborator_id
            || block.block_date != candidate.block_date
        {
            continue;
        }
        if block.overlaps_range(candidate.start, candidate.end) {
            return Err(BlockError::Overlap {
                existing_id: block.id.clone(),
                start: block.start,
                end: block.end,
            });
        }
    }
    Ok(())
}

/// Whether any full-day block covers `date`.
pub fn is_date_fully_blocked(blocks: &[FullDayBlock], date: NaiveDate) -> bool {
    blocks.iter().any(|b| b.contains(date))
}

/// Whether any time block on `date` overlaps the candidate range.
pub fn is_range_blocked(
    blocks: &[TimeBlock],
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
) -> bool {
    blocks
        .iter()
        .any(|b| b.block_date == date && b.overlaps_range(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn block(date: &str, start: &str, end: &str) -> TimeBlock {
        TimeBlock::new("c1", d(date), t(start), t(end), None)
    }

    #[test]
    fn full_day_block_range_is_inclusive() {
        let b = FullDayBlock::new("c1", d("2024-01-01"), d("2024-01-03"), "vacation");
        assert!(b.contains(d("2024-01-01")));
        assert!(b.contains(d("2024-01-02")));
        assert!(b.contains(d("2024-01-03")));
        assert!(!b.contains(d("2024-01-04")));
        assert!(!b.contains(d("2023-12-31")));
    }

    #[test]
    fn full_day_guard_rejects_inverted_range_only() {
        let ok = FullDayBlock::new("c1", d("2024-01-05"), d("2024-01-05"), "");
        assert_eq!(check_full_day_block(&ok), Ok(()));

        let inverted = FullDayBlock::new("c1", d("2024-01-05"), d("2024-01-04"), "");
        assert_eq!(check_full_day_block(&inverted), Err(BlockError::InvertedDateRange));

        // Overlapping full-day blocks are union-safe and stay allowed.
        let overlapping = FullDayBlock::new("c1", d("2024-01-01"), d("2024-01-10"), "");
        assert_eq!(check_full_day_block(&overlapping), Ok(()));
    }

    #[test]
    fn time_block_guard_rejects_overlap() {
        let existing = vec![block("2024-01-01", "12:00", "13:00")];
        let candidate = block("2024-01-01", "12:30", "13:30");
        match check_time_block(&existing, &candidate) {
            Err(BlockError::Overlap { existing_id, start, end }) => {
                assert_eq!(existing_id, existing[0].id);
                assert_eq!((start, end), (t("12:00"), t("13:00")));
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn time_block_guard_accepts_touching_intervals() {
        let existing = vec![block("2024-01-01", "09:00", "10:00")];
        assert_eq!(
            check_time_block(&existing, &block("2024-01-01", "10:00", "11:00")),
            Ok(())
        );
        assert_eq!(
            check_time_block(&existing, &block("2024-01-01", "08:00", "09:00")),
            Ok(())
        );
    }

    #[test]
    fn time_block_guard_ignores_other_dates_and_collaborators() {
        let existing = vec![
            block("2024-01-02", "12:00", "13:00"),
            TimeBlock::new("c2", d("2024-01-01"), t("12:00"), t("13:00"), None),
        ];
        assert_eq!(
            check_time_block(&existing, &block("2024-01-01", "12:00", "13:00")),
            Ok(())
        );
    }

    #[test]
    fn time_block_guard_rejects_empty_range() {
        assert_eq!(
            check_time_block(&[], &block("2024-01-01", "10:00", "10:00")),
            Err(BlockError::EmptyRange)
        );
        assert_eq!(
            check_time_block(&[], &block("2024-01-01", "11:00", "10:00")),
            Err(BlockError::EmptyRange)
        );
    }

    #[test]
    fn range_blocked_respects_date() {
        let blocks = vec![block("2024-01-01", "12:00", "13:00")];
        assert!(is_range_blocked(&blocks, d("2024-01-01"), t("12:30"), t("13:30")));
        assert!(!is_range_blocked(&blocks, d("2024-01-02"), t("12:30"), t("13:30")));
        assert!(!is_range_blocked(&blocks, d("2024-01-01"), t("13:00"), t("14:00")));
    }

    fn arb_range() -> impl Strategy<Value = (u16, u16)> {
        (0u16..1439).prop_flat_map(|s| ((s + 1)..=1439).prop_map(move |e| (s, e)))
    }

    proptest! {
        #[test]
        fn guard_agrees_with_overlap_predicate(a in arb_range(), b in arb_range()) {
            let date = d("2024-01-01");
            let existing = vec![TimeBlock::new(
                "c1",
                date,
                TimeOfDay::from_minutes(a.0).unwrap(),
                TimeOfDay::from_minutes(a.1).unwrap(),
                None,
            )];
            let candidate = TimeBlock::new(
                "c1",
                date,
                TimeOfDay::from_minutes(b.0).unwrap(),
                TimeOfDay::from_minutes(b.1).unwrap(),
                None,
            );
            let clash = overlaps(existing[0].start, existing[0].end, candidate.start, candidate.end);
            let verdict = check_time_block(&existing, &candidate);
            prop_assert_eq!(verdict.is_err(), clash);
        }
    }
}
