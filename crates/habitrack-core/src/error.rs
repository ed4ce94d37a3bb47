//! Core error types for habitrack-core.
//!
//! The domain layer reports exactly three kinds of failure through
//! [`HabitError`]: validation, malformed dates and missing habits. Storage and
//! configuration failures have their own enums and are folded into
//! [`CoreError`] together with the domain kinds.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Domain errors (validation, invalid date, not found)
    #[error(transparent)]
    Habit(#[from] HabitError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// The domain error carried by this error, if any.
    pub fn as_habit_error(&self) -> Option<&HabitError> {
        match self {
            CoreError::Habit(err) => Some(err),
            _ => None,
        }
    }

    /// True when the error means the targeted habit does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::Habit(HabitError::NotFound { .. }))
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::Habit(HabitError::Validation(err))
    }
}

/// Errors raised by the habit record and the streak engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HabitError {
    /// Name or description rejected; nothing was mutated
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Date string is not a canonical `YYYY-MM-DD` calendar date
    #[error("Invalid date '{value}': expected a calendar date as YYYY-MM-DD")]
    InvalidDate { value: String },

    /// No habit exists with this id (including one already deleted)
    #[error("Habit not found: {id}")]
    NotFound { id: String },
}

/// Field validation errors for habit name and description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Habit name is required")]
    EmptyName,

    #[error("Name cannot exceed {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    #[error("Description cannot exceed {max} characters (got {len})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("Field '{field}' has leading or trailing whitespace")]
    Untrimmed { field: &'static str },
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
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Persisted row no longer satisfies the habit invariants
    #[error("Corrupt record for habit {id}: {message}")]
    Corrupt { id: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseBusy
                    || err.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
