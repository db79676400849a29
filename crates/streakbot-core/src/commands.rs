//! Command dispatch: one inbound message in, one reply text out.
//!
//! Dispatch is a flat enum match. Validation failures turn into guidance
//! text; storage failures are logged and fall back to a generic failure
//! reply, so every message still gets exactly one answer.

use chrono::NaiveDate;
use indoc::indoc;
use tracing::error;

use crate::error::{BotError, ValidationError};
use crate::storage::Database;
use crate::streak::{self, phrases::PhrasePicker, DATE_FORMAT};
use crate::telegram::types::Message;

/// Recognized command keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Streak,
    SetStreak,
    Restart,
    Horny,
    Help,
    Unknown(String),
}

impl Command {
    pub fn parse(keyword: &str) -> Self {
        match keyword {
            "start" => Self::Start,
            "streak" => Self::Streak,
            "setstreak" => Self::SetStreak,
            "restart" => Self::Restart,
            "horny" => Self::Horny,
            "help" => Self::Help,
            other => Self::Unknown(other.to_string()),
        }
    }
}

pub const HELP_TEXT: &str = indoc! {"
    These are my commands.

    /help - this listing
    /streak - your current streak
    /setstreak YYYY-MM-DD - set when your streak started
    /restart - reset your streak to today
    /horny - emergency deterrent
"};

pub const UNKNOWN_COMMAND_TEXT: &str = "Unknown command. Try /help.";
pub const NOT_A_COMMAND_TEXT: &str = "I only speak commands. Try /help.";
pub const RESTART_TEXT: &str = "It's okay. Day 0 starts now. We got this.";
pub const STORAGE_FAILURE_TEXT: &str = "Something went wrong on my end. Try again in a bit.";

/// Produce the reply for one inbound message.
///
/// `today` is the caller's calendar date; passing it in keeps this function
/// deterministic under test.
pub fn reply_for(
    db: &Database,
    picker: &PhrasePicker,
    message: &Message,
    today: NaiveDate,
) -> String {
    if !message.is_command() {
        return NOT_A_COMMAND_TEXT.to_string();
    }

    let user_id = message.from.id;
    let result = match Command::parse(message.command()) {
        Command::Start => start_reply(db, user_id, today),
        Command::Streak => streak_reply(db, user_id, today),
        Command::SetStreak => set_streak_reply(db, user_id, message.command_arguments(), today),
        Command::Restart => streak::reset(db, user_id, today)
            .map(|()| RESTART_TEXT.to_string())
            .map_err(BotError::from),
        Command::Horny => Ok(picker.pick().to_string()),
        Command::Help => Ok(HELP_TEXT.to_string()),
        Command::Unknown(_) => Ok(UNKNOWN_COMMAND_TEXT.to_string()),
    };

    match result {
        Ok(text) => text,
        // Expected, user-recoverable: answer with guidance, no failure log.
        Err(BotError::Validation(e)) => guidance_for(&e),
        Err(e) => {
            error!(user_id, error = %e, "command handling failed");
            STORAGE_FAILURE_TEXT.to_string()
        }
    }
}

fn start_reply(db: &Database, user_id: i64, today: NaiveDate) -> Result<String, BotError> {
    let status = streak::get_or_init(db, user_id, today)?;
    Ok(if status.created {
        "Streak tracking started. You're on day 0.".to_string()
    } else {
        format!("Your streak is {} days long.", status.days)
    })
}

fn streak_reply(db: &Database, user_id: i64, today: NaiveDate) -> Result<String, BotError> {
    let status = streak::get_or_init(db, user_id, today)?;
    Ok(if status.created {
        "No streak on file, so I started one today. Day 0.".to_string()
    } else {
        format!(
            "{} days strong. Clean since {} \u{1f525}",
            status.days,
            status.start.format(DATE_FORMAT)
        )
    })
}

fn set_streak_reply(
    db: &Database,
    user_id: i64,
    raw: &str,
    today: NaiveDate,
) -> Result<String, BotError> {
    let status = streak::override_start(db, user_id, raw, today)?;
    Ok(format!(
        "Done. Streak start is {} and you're {} days in.",
        status.start.format(DATE_FORMAT),
        status.days
    ))
}

fn guidance_for(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyArgument => {
            "Give me a date: /setstreak YYYY-MM-DD".to_string()
        }
        ValidationError::InvalidFormat { input } => {
            format!("'{input}' is not a date I understand. Use /setstreak YYYY-MM-DD.")
        }
        ValidationError::FutureDate { .. } => {
            "That date is in the future. Pick the day the streak actually began.".to_string()
        }
    }
}
