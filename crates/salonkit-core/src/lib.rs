//! # Salonkit Core Library
//!
//! This library provides the collaborator availability and booking-conflict
//! engine of the Salonkit salon manager. The surrounding application (forms,
//! list views, the public booking page) is a thin layer over this core.
//!
//! ## Architecture
//!
//! - **Interval arithmetic**: minute-granularity clock times, half-open
//!   overlap and end-inclusive window tests
//! - **Weekly schedules**: one attendance window per weekday, validated as
//!   a whole before being persisted
//! - **Blocks**: full-day absences and single-date time blocks, guarded so
//!   overlapping time blocks are never created
//! - **Availability**: the single resolver booking flows consult, plus
//!   free-window computation for rendering open slots
//! - **Storage**: SQLite persistence that re-runs the pure guards inside
//!   the write transaction
//!
//! ## Key Components
//!
//! - [`resolve`]: availability verdict for a candidate booking window
//! - [`schedule::validate`]: full-form schedule validation
//! - [`check_time_block`]: the non-overlap creation guard
//! - [`SalonDb`]: schedule and block persistence
//! - [`Config`]: application configuration management

pub mod availability;
pub mod blocks;
pub mod error;
pub mod interval;
pub mod schedule;
pub mod storage;

pub use availability::{free_windows, resolve, AvailabilityQuery, AvailabilityVerdict, FreeWindow};
pub use blocks::{
    check_full_day_block, check_time_block, is_date_fully_blocked, is_range_blocked, BlockError,
    FullDayBlock, TimeBlock,
};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use interval::{is_within, overlaps, TimeOfDay, TimeParseError};
pub use schedule::{
    ScheduleErrorKey, ScheduleValidation, WeekDay, WeekDayParseError, WeeklySchedule,
    WorkScheduleDay,
};
pub use storage::{Config, PurgeSummary, SalonDb};
