//! # Streakbot Core Library
//!
//! Core logic for streakbot, a Telegram webhook bot that tracks per-user
//! day streaks. The CLI binary is a thin layer over this library: it wires
//! configuration, storage, and the webhook listener together and exposes
//! the same streak operations for local administration.
//!
//! ## Architecture
//!
//! - **Telegram**: wire types for the Bot API subset the bot consumes,
//!   command extraction from entity-annotated messages, and the outbound
//!   `sendMessage` client
//! - **Streak**: the per-user streak record lifecycle; streak length is
//!   derived from a stored start date, never stored itself
//! - **Storage**: SQLite-backed records with versioned migrations; the
//!   create-vs-update decision lives in atomic upserts keyed on the user id
//! - **Server**: a minimal webhook HTTP listener, one update per request,
//!   one reply per handled update
//!
//! ## Key Components
//!
//! - [`WebhookServer`]: accept loop and per-request handling
//! - [`Database`]: streak record persistence
//! - [`Config`]: environment-derived process configuration
//! - [`Command`]: recognized command keywords and dispatch

pub mod commands;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;
pub mod streak;
pub mod telegram;

pub use commands::Command;
pub use config::Config;
pub use error::{BotError, ConfigError, DatabaseError, TelegramError, ValidationError};
pub use server::WebhookServer;
pub use storage::{Database, StreakRecord};
pub use streak::StreakStatus;
pub use telegram::{TelegramClient, Update};
