//! Process configuration, read once from the environment at startup.
//!
//! Required keys are fatal when absent; nothing is re-read per request.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_WEBHOOK_PATH: &str = "/bot-handler";

/// Environment variable names.
pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_DATABASE_PATH: &str = "STREAKBOT_DB";
pub const ENV_PORT: &str = "STREAKBOT_PORT";
pub const ENV_WEBHOOK_PATH: &str = "STREAKBOT_WEBHOOK_PATH";

/// Everything the process needs to run, resolved at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the webhook listener binds on.
    pub port: u16,
    /// Telegram Bot API token for outbound replies.
    pub bot_token: String,
    /// SQLite database file path.
    pub database_path: PathBuf,
    /// Route Telegram is configured to POST updates to.
    pub webhook_path: String,
}

impl Config {
    /// Resolve the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if `BOT_TOKEN` or `STREAKBOT_DB` is missing, or if
    /// `STREAKBOT_PORT` does not parse as a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary variable source.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = require(&get, ENV_BOT_TOKEN)?;
        let database_path = PathBuf::from(require(&get, ENV_DATABASE_PATH)?);
        let port = match get(ENV_PORT) {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: ENV_PORT,
                    message: e.to_string(),
                }
            })?,
            None => DEFAULT_PORT,
        };
        let webhook_path =
            get(ENV_WEBHOOK_PATH).unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.to_string());

        Ok(Self {
            port,
            bot_token,
            database_path,
            webhook_path,
        })
    }
}

/// The database path alone, for local commands that never talk to Telegram.
///
/// # Errors
/// Returns an error if `STREAKBOT_DB` is unset or empty.
pub fn database_path_from_env() -> Result<PathBuf, ConfigError> {
    require(&|key: &str| std::env::var(key).ok(), ENV_DATABASE_PATH).map(PathBuf::from)
}

fn require(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    match get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingKey(key)),
    }
}
