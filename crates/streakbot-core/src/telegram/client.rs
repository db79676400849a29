//! Outbound Telegram Bot API client.
//!
//! The bot makes exactly one kind of call: `sendMessage`, one form-encoded
//! POST per handled update. No retries; delivery failures are the caller's
//! to log.

use reqwest::Client;
use tracing::debug;

use crate::error::TelegramError;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramClient {
    http: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, TELEGRAM_API_BASE)
    }

    /// Point the client at a different API host (tests use a mock server).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Send one text reply to a chat.
    ///
    /// # Errors
    /// Returns an error if the request cannot be sent or the API answers
    /// with a non-success status.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let response = self
            .http
            .post(&url)
            .form(&[("chat_id", chat_id.to_string()), ("text", text.to_string())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(chat_id, "reply delivered");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(TelegramError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}
