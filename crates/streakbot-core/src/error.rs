//! Core error types for streakbot-core.
//!
//! One enum per concern, tied together by [`BotError`]. Validation errors are
//! the only recoverable kind: they map to user-facing guidance instead of a
//! failure reply.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for streakbot-core.
#[derive(Error, Debug)]
pub enum BotError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Outbound Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// Argument-validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required environment variable
    #[error("Missing required environment variable: {0}")]
    MissingKey(&'static str),

    /// Invalid configuration value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Outbound Telegram API errors.
#[derive(Error, Debug)]
pub enum TelegramError {
    /// Request never reached the API or the response could not be read
    #[error("Failed to reach Telegram: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Telegram API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

/// Argument-validation errors for user-supplied command arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank or whitespace-only argument
    #[error("no date given")]
    EmptyArgument,

    /// Not a date in YYYY-MM-DD form
    #[error("'{input}' is not a YYYY-MM-DD date")]
    InvalidFormat { input: String },

    /// Date lies strictly after today
    #[error("{date} is in the future")]
    FutureDate { date: chrono::NaiveDate },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for BotError
pub type Result<T, E = BotError> = std::result::Result<T, E>;
