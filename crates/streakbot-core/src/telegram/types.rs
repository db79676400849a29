//! Telegram wire types for the Bot API subset the bot consumes.
//!
//! Field shapes mirror the JSON envelope Telegram delivers to the webhook.
//! Everything the bot does not read is left out; serde ignores unknown
//! fields by default.

use serde::{Deserialize, Serialize};

/// One inbound event from Telegram, delivered per webhook call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    /// Absent for update kinds the bot does not handle (edits, channel
    /// posts, ...).
    #[serde(default)]
    pub message: Option<Message>,
}

/// A user message inside an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub chat: Chat,
    #[serde(rename = "from", default)]
    pub from: User,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
}

/// An annotation span attached to a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

/// The sender of a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
}

/// The conversation a message belongs to; replies go back to this id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default)]
    pub id: i64,
}

impl MessageEntity {
    pub fn is_command(&self) -> bool {
        self.kind == "bot_command"
    }
}

impl Message {
    /// Whether this message is a command invocation: the first entity is a
    /// `bot_command` spanning from position zero, and the text carries the
    /// slash marker there.
    pub fn is_command(&self) -> bool {
        self.text.starts_with('/')
            && self
                .entities
                .first()
                .is_some_and(|entity| entity.offset == 0 && entity.is_command())
    }

    /// The command keyword, without the leading slash. Empty when the
    /// message is not a command or the entity span is malformed.
    pub fn command(&self) -> &str {
        if !self.is_command() {
            return "";
        }
        let end = self.entities[0].length.min(self.text.len());
        if end <= 1 || !self.text.is_char_boundary(end) {
            return "";
        }
        &self.text[1..end]
    }

    /// The text after the command token and one separating space. Empty when
    /// the command spans the whole message.
    pub fn command_arguments(&self) -> &str {
        if !self.is_command() {
            return "";
        }
        let length = self.entities[0].length;
        if self.text.len() <= length {
            return "";
        }
        let start = length + 1;
        if start >= self.text.len() || !self.text.is_char_boundary(start) {
            return "";
        }
        &self.text[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_message(text: &str, entity_length: usize) -> Message {
        Message {
            text: text.to_string(),
            entities: vec![MessageEntity {
                kind: "bot_command".to_string(),
                offset: 0,
                length: entity_length,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn bare_command_has_empty_arguments() {
        let msg = command_message("/start", 6);
        assert!(msg.is_command());
        assert_eq!(msg.command(), "start");
        assert_eq!(msg.command_arguments(), "");
    }

    #[test]
    fn command_with_arguments() {
        let msg = command_message("/setstreak 2023-01-01", 10);
        assert_eq!(msg.command(), "setstreak");
        assert_eq!(msg.command_arguments(), "2023-01-01");
    }

    #[test]
    fn no_entities_means_no_command() {
        let msg = Message {
            text: "/start".to_string(),
            ..Default::default()
        };
        assert!(!msg.is_command());
        assert_eq!(msg.command(), "");
        assert_eq!(msg.command_arguments(), "");
    }

    #[test]
    fn nonzero_offset_is_not_a_command() {
        let msg = Message {
            text: "see /help".to_string(),
            entities: vec![MessageEntity {
                kind: "bot_command".to_string(),
                offset: 4,
                length: 5,
            }],
            ..Default::default()
        };
        assert!(!msg.is_command());
    }

    #[test]
    fn non_command_entity_kind_is_ignored() {
        let msg = Message {
            text: "@streakbot hi".to_string(),
            entities: vec![MessageEntity {
                kind: "mention".to_string(),
                offset: 0,
                length: 10,
            }],
            ..Default::default()
        };
        assert!(!msg.is_command());
    }

    #[test]
    fn empty_text_is_not_a_command() {
        let msg = command_message("", 6);
        assert!(!msg.is_command());
        assert_eq!(msg.command(), "");
    }

    #[test]
    fn oversized_entity_length_is_clamped() {
        let msg = command_message("/hi", 40);
        assert_eq!(msg.command(), "hi");
        assert_eq!(msg.command_arguments(), "");
    }

    #[test]
    fn trailing_space_only_means_empty_arguments() {
        let msg = command_message("/streak ", 7);
        assert_eq!(msg.command(), "streak");
        assert_eq!(msg.command_arguments(), "");
    }

    #[test]
    fn update_decodes_from_wire_json() {
        let raw = r#"{
            "update_id": 10000,
            "message": {
                "message_id": 1,
                "from": {"id": 1111, "is_bot": false, "first_name": "Ada"},
                "chat": {"id": 1111, "type": "private"},
                "date": 1441645532,
                "text": "/setstreak 2023-01-01",
                "entities": [{"type": "bot_command", "offset": 0, "length": 10}]
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.from.id, 1111);
        assert_eq!(message.chat.id, 1111);
        assert_eq!(message.command(), "setstreak");
        assert_eq!(message.command_arguments(), "2023-01-01");
    }

    #[test]
    fn update_without_message_decodes() {
        let update: Update = serde_json::from_str(r#"{"update_id": 5}"#).unwrap();
        assert!(update.message.is_none());
    }
}
