//! Core error types for salonkit-core.
//!
//! Layered thiserror enums: the storage and config layers have their own
//! error types, and [`CoreError`] is the umbrella callers match on.

use std::path::PathBuf;

use thiserror::Error;

use crate::blocks::BlockError;
use crate::interval::TimeParseError;
use crate::schedule::{ScheduleValidation, WeekDayParseError};

/// Core error type for salonkit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A block creation was rejected by the conflict guard
    #[error("Block rejected: {0}")]
    Block(#[from] BlockError),

    /// A schedule failed validation and was not persisted
    #[error("Schedule rejected: {0}")]
    InvalidSchedule(ScheduleValidation),

    /// A stored or submitted clock time was not "HH:MM"
    #[error(transparent)]
    TimeParse(#[from] TimeParseError),

    /// A stored or submitted weekday name was unknown
    #[error(transparent)]
    WeekDayParse(#[from] WeekDayParseError),

    /// A stored date was not "YYYY-MM-DD"
    #[error("Invalid date: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(DatabaseError::QueryFailed(err))
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A delete targeted a row that does not exist
    #[error("No row with id {0}")]
    NotFound(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the config file
    #[error("Failed to write config to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML
    #[error("Invalid config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// The config could not be serialized
    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
}
