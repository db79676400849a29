pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{Chat, Message, MessageEntity, Update, User};
