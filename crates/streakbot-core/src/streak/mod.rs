//! Streak state manager.
//!
//! Owns the per-user streak record lifecycle: create on first touch, reset to
//! today, override to a validated past date. The streak length itself is
//! never stored; it is derived from the stored start date on every read.
//!
//! All operations take `today` as a parameter so callers control the clock
//! and tests stay deterministic.

pub mod phrases;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{BotError, DatabaseError, ValidationError};
use crate::storage::Database;

/// Stored date format, `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of looking up (and possibly creating) a user's streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakStatus {
    /// Whether this call created the record.
    pub created: bool,
    /// Whole days elapsed since the streak started. Never negative for a
    /// stored record.
    pub days: i64,
    /// The streak's start date.
    pub start: NaiveDate,
}

/// Look up a user's streak, creating a day-zero record on first touch.
///
/// Backs both the first-touch and the status command; they differ only in
/// the reply text built from the result.
///
/// # Errors
/// Returns an error if the storage round trip fails.
pub fn get_or_init(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
) -> Result<StreakStatus, DatabaseError> {
    let created = db.insert_streak_if_absent(user_id, today)?;
    let start = db.streak_start(user_id)?.ok_or_else(|| {
        DatabaseError::QueryFailed(format!("streak row missing after upsert for user {user_id}"))
    })?;
    Ok(StreakStatus {
        created,
        days: days_since(start, today),
        start,
    })
}

/// Set (or create) the record's streak start to today. Idempotent.
///
/// # Errors
/// Returns an error if the storage round trip fails.
pub fn reset(db: &Database, user_id: i64, today: NaiveDate) -> Result<(), DatabaseError> {
    db.upsert_streak_start(user_id, today)
}

/// Set (or create) the record's streak start to a user-supplied date.
///
/// Validation failures leave storage untouched.
///
/// # Errors
/// Returns [`BotError::Validation`] for a blank, unparsable, or future date,
/// or [`BotError::Database`] if the storage round trip fails.
pub fn override_start(
    db: &Database,
    user_id: i64,
    raw: &str,
    today: NaiveDate,
) -> Result<StreakStatus, BotError> {
    let start = parse_start_date(raw, today)?;
    db.upsert_streak_start(user_id, start)?;
    Ok(StreakStatus {
        created: false,
        days: days_since(start, today),
        start,
    })
}

/// Validate a user-supplied start date: `YYYY-MM-DD`, not blank, not in the
/// future.
pub fn parse_start_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyArgument);
    }
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            input: trimmed.to_string(),
        }
    })?;
    if date > today {
        return Err(ValidationError::FutureDate { date });
    }
    Ok(date)
}

/// Whole days from `start` to `today`.
pub fn days_since(start: NaiveDate, today: NaiveDate) -> i64 {
    today.signed_duration_since(start).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    const TODAY: &str = "2024-06-15";

    #[test]
    fn first_touch_creates_day_zero() {
        let db = Database::open_memory().unwrap();
        let status = get_or_init(&db, 1, date(TODAY)).unwrap();
        assert!(status.created);
        assert_eq!(status.days, 0);
        assert_eq!(status.start, date(TODAY));
    }

    #[test]
    fn get_or_init_is_idempotent() {
        let db = Database::open_memory().unwrap();
        let first = get_or_init(&db, 1, date(TODAY)).unwrap();
        let second = get_or_init(&db, 1, date(TODAY)).unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.days, second.days);
        assert_eq!(first.start, second.start);
    }

    #[test]
    fn reset_returns_streak_to_zero() {
        let db = Database::open_memory().unwrap();
        override_start(&db, 1, "2024-01-01", date(TODAY)).unwrap();
        reset(&db, 1, date(TODAY)).unwrap();
        let status = get_or_init(&db, 1, date(TODAY)).unwrap();
        assert_eq!(status.days, 0);
        assert_eq!(status.start, date(TODAY));
    }

    #[test]
    fn reset_is_idempotent() {
        let db = Database::open_memory().unwrap();
        reset(&db, 1, date(TODAY)).unwrap();
        reset(&db, 1, date(TODAY)).unwrap();
        assert_eq!(db.streak_start(1).unwrap(), Some(date(TODAY)));
    }

    #[test]
    fn override_computes_elapsed_days() {
        let db = Database::open_memory().unwrap();
        let status = override_start(&db, 1, "2024-06-01", date(TODAY)).unwrap();
        assert_eq!(status.days, 14);
        assert_eq!(status.start, date("2024-06-01"));
    }

    #[test]
    fn override_accepts_today() {
        let db = Database::open_memory().unwrap();
        let status = override_start(&db, 1, TODAY, date(TODAY)).unwrap();
        assert_eq!(status.days, 0);
    }

    #[test]
    fn override_rejects_future_date_and_keeps_record() {
        let db = Database::open_memory().unwrap();
        override_start(&db, 1, "2024-06-01", date(TODAY)).unwrap();

        let err = override_start(&db, 1, "2099-01-01", date(TODAY)).unwrap_err();
        assert!(matches!(
            err,
            BotError::Validation(ValidationError::FutureDate { .. })
        ));
        assert_eq!(db.streak_start(1).unwrap(), Some(date("2024-06-01")));
    }

    #[test]
    fn override_rejects_garbage_and_keeps_record() {
        let db = Database::open_memory().unwrap();
        override_start(&db, 1, "2024-06-01", date(TODAY)).unwrap();

        let err = override_start(&db, 1, "not-a-date", date(TODAY)).unwrap_err();
        assert!(matches!(
            err,
            BotError::Validation(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(db.streak_start(1).unwrap(), Some(date("2024-06-01")));
    }

    #[test]
    fn override_rejects_blank_argument() {
        let db = Database::open_memory().unwrap();
        let err = override_start(&db, 1, "   ", date(TODAY)).unwrap_err();
        assert!(matches!(
            err,
            BotError::Validation(ValidationError::EmptyArgument)
        ));
        assert_eq!(db.streak_start(1).unwrap(), None);
    }

    #[test]
    fn parse_rejects_trailing_text() {
        let err = parse_start_date("2024-06-01 extra", date(TODAY)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn concurrent_first_touch_creates_one_record() {
        use std::sync::{Arc, Mutex};

        let db = Arc::new(Mutex::new(Database::open_memory().unwrap()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = Arc::clone(&db);
                std::thread::spawn(move || {
                    let db = db.lock().unwrap();
                    get_or_init(&db, 99, date(TODAY)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let db = db.lock().unwrap();
        assert_eq!(db.record_count().unwrap(), 1);
        assert_eq!(db.streak_start(99).unwrap(), Some(date(TODAY)));
    }

    proptest! {
        /// For any valid past date d, override then read back reports
        /// exactly (today - d) days.
        #[test]
        fn override_then_read_reports_elapsed_days(offset in 0i64..20_000) {
            let today = date(TODAY);
            let start = today - chrono::Duration::days(offset);
            let raw = start.format(DATE_FORMAT).to_string();

            let db = Database::open_memory().unwrap();
            override_start(&db, 1, &raw, today).unwrap();
            let status = get_or_init(&db, 1, today).unwrap();
            prop_assert_eq!(status.days, offset);
            prop_assert_eq!(status.start, start);
        }
    }
}
