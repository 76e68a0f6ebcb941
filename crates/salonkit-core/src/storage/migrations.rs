//! Database schema migrations for salonkit.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration
//! version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current schema
/// version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

/// Record the schema version after a successful migration.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: the three collaborator tables.
///
/// `collaborator_schedules` holds one row per ENABLED weekday; absence of a
/// row means the day is disabled. Clock times are `HH:MM` strings, dates are
/// `YYYY-MM-DD` strings.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS collaborator_schedules (
            collaborator_id TEXT NOT NULL,
            day_of_week     TEXT NOT NULL,
            start_time      TEXT NOT NULL,
            end_time        TEXT NOT NULL,
            PRIMARY KEY (collaborator_id, day_of_week)
        );

        CREATE TABLE IF NOT EXISTS collaborator_blocks (
            id              TEXT PRIMARY KEY,
            collaborator_id TEXT NOT NULL,
            start_date      TEXT NOT NULL,
            end_date        TEXT NOT NULL,
            reason          TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS collaborator_time_blocks (
            id              TEXT PRIMARY KEY,
            collaborator_id TEXT NOT NULL,
            block_date      TEXT NOT NULL,
            start_time      TEXT NOT NULL,
            end_time        TEXT NOT NULL,
            reason          TEXT
        );",
    )?;
    set_schema_version(conn, 1)
}

/// v2: lookup indexes for the block tables.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_blocks_collaborator
             ON collaborator_blocks(collaborator_id);

        CREATE INDEX IF NOT EXISTS idx_time_blocks_collaborator_date
             ON collaborator_time_blocks(collaborator_id, block_date);",
    )?;
    set_schema_version(conn, 2)
}
