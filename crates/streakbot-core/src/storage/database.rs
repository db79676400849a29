//! SQLite-backed streak record storage.
//!
//! The streak manager is the only component that touches this table. The
//! create-vs-update decision is pushed into single-statement upserts keyed on
//! `user_id`, so two concurrent requests for the same unseen user can never
//! produce two rows or lose a write.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::DatabaseError;
use crate::streak::DATE_FORMAT;

use super::migrations;

/// One user's stored streak row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakRecord {
    pub user_id: i64,
    pub streak_start: NaiveDate,
}

/// SQLite database holding per-user streak records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (and migrate) the database at `path`, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        migrations::migrate(&db.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        migrations::migrate(&db.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Look up a user's full streak record.
    pub fn record(&self, user_id: i64) -> Result<Option<StreakRecord>, DatabaseError> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT streak_start FROM streaks WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(text) => {
                let streak_start = NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
                    DatabaseError::QueryFailed(format!("corrupt streak_start '{text}': {e}"))
                })?;
                Ok(Some(StreakRecord {
                    user_id,
                    streak_start,
                }))
            }
            None => Ok(None),
        }
    }

    /// Look up a user's streak start date.
    pub fn streak_start(&self, user_id: i64) -> Result<Option<NaiveDate>, DatabaseError> {
        Ok(self.record(user_id)?.map(|record| record.streak_start))
    }

    /// Insert a fresh record unless one already exists.
    ///
    /// Returns `true` when this call created the record. The `DO NOTHING`
    /// conflict arm keeps concurrent first-touch calls down to exactly one
    /// stored row.
    pub fn insert_streak_if_absent(
        &self,
        user_id: i64,
        start: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "INSERT INTO streaks (user_id, streak_start) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO NOTHING",
            params![user_id, start.format(DATE_FORMAT).to_string()],
        )?;
        Ok(changed == 1)
    }

    /// Set (or create) a record's streak start in a single atomic upsert.
    pub fn upsert_streak_start(
        &self,
        user_id: i64,
        start: NaiveDate,
    ) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO streaks (user_id, streak_start) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET streak_start = excluded.streak_start",
            params![user_id, start.format(DATE_FORMAT).to_string()],
        )?;
        Ok(())
    }

    /// Number of stored streak records.
    pub fn record_count(&self) -> Result<i64, DatabaseError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM streaks", [], |row| row.get(0))?;
        Ok(count)
    }
}
