//! SQLite-based storage for collaborator schedules and absence blocks.
//!
//! The pure guards in [`crate::blocks`] and [`crate::schedule`] define the
//! policy; this layer re-runs them at the write boundary so two concurrent
//! creates cannot both slip past a stale client-side snapshot:
//! [`SalonDb::insert_time_block`] re-reads the same-date block set and
//! re-checks the overlap guard inside a single immediate transaction, and
//! [`SalonDb::replace_schedule`] validates before touching any row.

use chrono::NaiveDate;
use rusqlite::{params, Connection, TransactionBehavior};

use super::data_dir;
use super::migrations;
use crate::blocks::{check_full_day_block, check_time_block, FullDayBlock, TimeBlock};
use crate::error::{CoreError, DatabaseError};
use crate::interval::TimeOfDay;
use crate::schedule::{self, WeekDay, WeeklySchedule, WorkScheduleDay};

/// Build a FullDayBlock from a database row.
fn row_to_full_day_block(row: &rusqlite::Row) -> Result<FullDayBlock, CoreError> {
    Ok(FullDayBlock {
        id: row.get(0)?,
        collaborator_id: row.get(1)?,
        start_date: row.get::<_, String>(2)?.parse::<NaiveDate>()?,
        end_date: row.get::<_, String>(3)?.parse::<NaiveDate>()?,
        reason: row.get(4)?,
    })
}

/// Build a TimeBlock from a database row.
fn row_to_time_block(row: &rusqlite::Row) -> Result<TimeBlock, CoreError> {
    Ok(TimeBlock {
        id: row.get(0)?,
        collaborator_id: row.get(1)?,
        block_date: row.get::<_, String>(2)?.parse::<NaiveDate>()?,
        start: row.get::<_, String>(3)?.parse::<TimeOfDay>()?,
        end: row.get::<_, String>(4)?.parse::<TimeOfDay>()?,
        reason: row.get(5)?,
    })
}

/// Load the time blocks for one collaborator and date, ascending by start.
///
/// Takes a plain connection so it can run both standalone and inside the
/// insert transaction.
fn time_blocks_on(
    conn: &Connection,
    collaborator_id: &str,
    date: NaiveDate,
) -> Result<Vec<TimeBlock>, CoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, collaborator_id, block_date, start_time, end_time, reason
         FROM collaborator_time_blocks
         WHERE collaborator_id = ?1 AND block_date = ?2
         ORDER BY start_time ASC",
    )?;
    let mut rows = stmt.query(params![collaborator_id, date.to_string()])?;
    let mut blocks = Vec::new();
    while let Some(row) = rows.next()? {
        blocks.push(row_to_time_block(row)?);
    }
    Ok(blocks)
}

/// What `delete_all_for_collaborator` removed from each table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeSummary {
    pub schedule_rows: usize,
    pub full_day_blocks: usize,
    pub time_blocks: usize,
}

/// SQLite database for collaborator schedules and blocks.
pub struct SalonDb {
    conn: Connection,
}

impl SalonDb {
    /// Open the database at `~/.config/salonkit/salonkit.db`.
    ///
    /// Creates tables and applies pending migrations.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("salonkit.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(DatabaseError::QueryFailed)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), CoreError> {
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // === Weekly schedules ===

    /// Load a collaborator's weekly schedule.
    ///
    /// Weekdays without a row come back disabled, so a collaborator with no
    /// rows at all gets the all-disabled schedule they started with.
    pub fn load_schedule(&self, collaborator_id: &str) -> Result<WeeklySchedule, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT day_of_week, start_time, end_time
             FROM collaborator_schedules
             WHERE collaborator_id = ?1",
        )?;
        let mut rows = stmt.query(params![collaborator_id])?;
        let mut schedule = WeeklySchedule::all_disabled();
        while let Some(row) = rows.next()? {
            let day = row.get::<_, String>(0)?.parse::<WeekDay>()?;
            let start = row.get::<_, String>(1)?.parse::<TimeOfDay>()?;
            let end = row.get::<_, String>(2)?.parse::<TimeOfDay>()?;
            schedule.set_day(WorkScheduleDay::working(day, start, end));
        }
        Ok(schedule)
    }

    /// Replace a collaborator's weekly schedule wholesale.
    ///
    /// Validates first; an invalid schedule never touches the database.
    /// Delete-all plus insert of the enabled days runs in one transaction.
    pub fn replace_schedule(
        &mut self,
        collaborator_id: &str,
        schedule: &WeeklySchedule,
    ) -> Result<(), CoreError> {
        let report = schedule::validate(schedule);
        if !report.is_valid() {
            return Err(CoreError::InvalidSchedule(report));
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM collaborator_schedules WHERE collaborator_id = ?1",
            params![collaborator_id],
        )?;
        for day in schedule.days() {
            let Some((start, end)) = day.window() else {
                continue;
            };
            tx.execute(
                "INSERT INTO collaborator_schedules
                     (collaborator_id, day_of_week, start_time, end_time)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    collaborator_id,
                    day.day.as_str(),
                    start.to_string(),
                    end.to_string()
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // === Full-day blocks ===

    /// List a collaborator's full-day blocks, ascending by start date.
    pub fn list_full_day_blocks(
        &self,
        collaborator_id: &str,
    ) -> Result<Vec<FullDayBlock>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, collaborator_id, start_date, end_date, reason
             FROM collaborator_blocks
             WHERE collaborator_id = ?1
             ORDER BY start_date ASC",
        )?;
        let mut rows = stmt.query(params![collaborator_id])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            blocks.push(row_to_full_day_block(row)?);
        }
        Ok(blocks)
    }

    /// Insert a full-day block after the structural guard.
    pub fn insert_full_day_block(&self, block: &FullDayBlock) -> Result<(), CoreError> {
        check_full_day_block(block)?;
        self.conn.execute(
            "INSERT INTO collaborator_blocks
                 (id, collaborator_id, start_date, end_date, reason)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                block.id,
                block.collaborator_id,
                block.start_date.to_string(),
                block.end_date.to_string(),
                block.reason
            ],
        )?;
        Ok(())
    }

    /// Delete one full-day block by id.
    pub fn delete_full_day_block(&self, id: &str) -> Result<(), CoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM collaborator_blocks WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(DatabaseError::NotFound(id.to_string()).into());
        }
        Ok(())
    }

    // === Time blocks ===

    /// List all of a collaborator's time blocks, ascending by date and start.
    pub fn list_time_blocks(&self, collaborator_id: &str) -> Result<Vec<TimeBlock>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, collaborator_id, block_date, start_time, end_time, reason
             FROM collaborator_time_blocks
             WHERE collaborator_id = ?1
             ORDER BY block_date ASC, start_time ASC",
        )?;
        let mut rows = stmt.query(params![collaborator_id])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            blocks.push(row_to_time_block(row)?);
        }
        Ok(blocks)
    }

    /// List a collaborator's time blocks on one date, ascending by start.
    pub fn list_time_blocks_on(
        &self,
        collaborator_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeBlock>, CoreError> {
        time_blocks_on(&self.conn, collaborator_id, date)
    }

    /// Insert a time block, enforcing the same-day non-overlap invariant at
    /// the write boundary.
    ///
    /// The same-date block set is re-read and the overlap guard re-run
    /// inside a single immediate transaction, so a stale caller snapshot
    /// cannot let two overlapping blocks both land.
    pub fn insert_time_block(&mut self, block: &TimeBlock) -> Result<(), CoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing = time_blocks_on(&tx, &block.collaborator_id, block.block_date)?;
        check_time_block(&existing, block)?;

        tx.execute(
            "INSERT INTO collaborator_time_blocks
                 (id, collaborator_id, block_date, start_time, end_time, reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                block.id,
                block.collaborator_id,
                block.block_date.to_string(),
                block.start.to_string(),
                block.end.to_string(),
                block.reason
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete one time block by id.
    pub fn delete_time_block(&self, id: &str) -> Result<(), CoreError> {
        let affected = self.conn.execute(
            "DELETE FROM collaborator_time_blocks WHERE id = ?1",
            params![id],
        )?;
        if affected == 0 {
            return Err(DatabaseError::NotFound(id.to_string()).into());
        }
        Ok(())
    }

    // === Collaborator lifecycle ===

    /// Remove everything stored for a collaborator, in one transaction.
    ///
    /// Used when the owning collaborator is deleted (cascade).
    pub fn delete_all_for_collaborator(
        &mut self,
        collaborator_id: &str,
    ) -> Result<PurgeSummary, CoreError> {
        let tx = self.conn.transaction()?;
        let schedule_rows = tx.execute(
            "DELETE FROM collaborator_schedules WHERE collaborator_id = ?1",
            params![collaborator_id],
        )?;
        let full_day_blocks = tx.execute(
            "DELETE FROM collaborator_blocks WHERE collaborator_id = ?1",
            params![collaborator_id],
        )?;
        let time_blocks = tx.execute(
            "DELETE FROM collaborator_time_blocks WHERE collaborator_id = ?1",
            params![collaborator_id],
        )?;
        tx.commit()?;
        Ok(PurgeSummary {
            schedule_rows,
            full_day_blocks,
            time_blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockError;
    use crate::schedule::ScheduleErrorKey;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn weekday_schedule() -> WeeklySchedule {
        let mut schedule = WeeklySchedule::all_disabled();
        for day in [WeekDay::Monday, WeekDay::Tuesday, WeekDay::Friday] {
            schedule.set_day(WorkScheduleDay::working(day, t("09:00"), t("18:00")));
        }
        schedule
    }

    #[test]
    fn schedule_replace_and_load_round_trip() {
        let mut db = SalonDb::open_memory().unwrap();
        let schedule = weekday_schedule();
        db.replace_schedule("c1", &schedule).unwrap();

        let loaded = db.load_schedule("c1").unwrap();
        assert_eq!(loaded, schedule);

        // Disabled days produced no rows.
        let rows: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM collaborator_schedules WHERE collaborator_id = 'c1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 3);
    }

    #[test]
    fn unknown_collaborator_loads_all_disabled() {
        let db = SalonDb::open_memory().unwrap();
        let loaded = db.load_schedule("nobody").unwrap();
        assert_eq!(loaded, WeeklySchedule::all_disabled());
    }

    #[test]
    fn replace_overwrites_the_previous_schedule() {
        let mut db = SalonDb::open_memory().unwrap();
        db.replace_schedule("c1", &weekday_schedule()).unwrap();

        let mut narrower = WeeklySchedule::all_disabled();
        narrower.set_day(WorkScheduleDay::working(WeekDay::Wednesday, t("10:00"), t("14:00")));
        db.replace_schedule("c1", &narrower).unwrap();

        let loaded = db.load_schedule("c1").unwrap();
        assert_eq!(loaded, narrower);
        assert!(!loaded.day(WeekDay::Monday).enabled);
    }

    #[test]
    fn invalid_schedule_is_rejected_before_any_write() {
        let mut db = SalonDb::open_memory().unwrap();
        db.replace_schedule("c1", &weekday_schedule()).unwrap();

        let err = db
            .replace_schedule("c1", &WeeklySchedule::all_disabled())
            .unwrap_err();
        match err {
            CoreError::InvalidSchedule(report) => {
                assert!(report.errors().contains_key(&ScheduleErrorKey::General));
            }
            other => panic!("expected InvalidSchedule, got {other:?}"),
        }

        // The previous schedule is untouched.
        assert_eq!(db.load_schedule("c1").unwrap(), weekday_schedule());
    }

    #[test]
    fn full_day_blocks_round_trip_and_delete() {
        let db = SalonDb::open_memory().unwrap();
        let block = FullDayBlock::new("c1", d("2024-01-01"), d("2024-01-03"), "vacation");
        db.insert_full_day_block(&block).unwrap();

        let listed = db.list_full_day_blocks("c1").unwrap();
        assert_eq!(listed, vec![block.clone()]);
        assert!(db.list_full_day_blocks("c2").unwrap().is_empty());

        db.delete_full_day_block(&block.id).unwrap();
        assert!(db.list_full_day_blocks("c1").unwrap().is_empty());
    }

    #[test]
    fn inverted_full_day_block_is_rejected() {
        let db = SalonDb::open_memory().unwrap();
        let block = FullDayBlock::new("c1", d("2024-01-05"), d("2024-01-04"), "");
        let err = db.insert_full_day_block(&block).unwrap_err();
        assert!(matches!(err, CoreError::Block(BlockError::InvertedDateRange)));
        assert!(db.list_full_day_blocks("c1").unwrap().is_empty());
    }

    #[test]
    fn overlapping_time_block_is_rejected_at_the_write_boundary() {
        let mut db = SalonDb::open_memory().unwrap();
        let first = TimeBlock::new("c1", d("2024-01-01"), t("12:00"), t("13:00"), None);
        db.insert_time_block(&first).unwrap();

        // Even with a stale (empty) caller snapshot the insert re-checks.
        let clashing = TimeBlock::new("c1", d("2024-01-01"), t("12:30"), t("13:30"), None);
        let err = db.insert_time_block(&clashing).unwrap_err();
        assert!(matches!(err, CoreError::Block(BlockError::Overlap { .. })));
        assert_eq!(db.list_time_blocks("c1").unwrap(), vec![first]);
    }

    #[test]
    fn touching_time_blocks_are_accepted() {
        let mut db = SalonDb::open_memory().unwrap();
        let morning = TimeBlock::new("c1", d("2024-01-01"), t("09:00"), t("10:00"), None);
        let next = TimeBlock::new("c1", d("2024-01-01"), t("10:00"), t("11:00"), None);
        db.insert_time_block(&morning).unwrap();
        db.insert_time_block(&next).unwrap();

        let listed = db.list_time_blocks_on("c1", d("2024-01-01")).unwrap();
        assert_eq!(listed, vec![morning, next]);
    }

    #[test]
    fn time_blocks_on_other_dates_do_not_conflict() {
        let mut db = SalonDb::open_memory().unwrap();
        let monday = TimeBlock::new("c1", d("2024-01-01"), t("12:00"), t("13:00"), None);
        let tuesday = TimeBlock::new("c1", d("2024-01-02"), t("12:00"), t("13:00"), None);
        db.insert_time_block(&monday).unwrap();
        db.insert_time_block(&tuesday).unwrap();

        assert_eq!(db.list_time_blocks("c1").unwrap().len(), 2);
        assert_eq!(db.list_time_blocks_on("c1", d("2024-01-02")).unwrap(), vec![tuesday]);
    }

    #[test]
    fn deleting_a_missing_block_reports_not_found() {
        let db = SalonDb::open_memory().unwrap();
        let err = db.delete_time_block("missing").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::NotFound(_))
        ));
    }

    #[test]
    fn collaborator_purge_cascades_across_all_tables() {
        let mut db = SalonDb::open_memory().unwrap();
        db.replace_schedule("c1", &weekday_schedule()).unwrap();
        db.insert_full_day_block(&FullDayBlock::new("c1", d("2024-01-01"), d("2024-01-01"), ""))
            .unwrap();
        db.insert_time_block(&TimeBlock::new("c1", d("2024-01-02"), t("12:00"), t("13:00"), None))
            .unwrap();
        // Another collaborator must be untouched.
        db.insert_time_block(&TimeBlock::new("c2", d("2024-01-02"), t("12:00"), t("13:00"), None))
            .unwrap();

        let summary = db.delete_all_for_collaborator("c1").unwrap();
        assert_eq!(
            summary,
            PurgeSummary {
                schedule_rows: 3,
                full_day_blocks: 1,
                time_blocks: 1,
            }
        );
        assert_eq!(db.load_schedule("c1").unwrap(), WeeklySchedule::all_disabled());
        assert!(db.list_full_day_blocks("c1").unwrap().is_empty());
        assert!(db.list_time_blocks("c1").unwrap().is_empty());
        assert_eq!(db.list_time_blocks("c2").unwrap().len(), 1);
    }
}
