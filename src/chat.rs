use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GREETING_ID: &str = "welcome";
pub const GREETING_TEXT: &str = "Asalam o Alayikum!! Main aap ki kia help kar sakta hun? 😊";
pub const ERROR_REPLY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    /// Part of the data model but never assigned: failed exchanges still mark
    /// the user message `Sent` and report the failure through a bot message.
    #[allow(dead_code)]
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

impl ChatMessage {
    /// A freshly typed user message, waiting on its exchange.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            status: MessageStatus::Sending,
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            status: MessageStatus::Sent,
        }
    }

    pub fn greeting() -> Self {
        Self {
            id: GREETING_ID.to_string(),
            ..Self::bot(GREETING_TEXT)
        }
    }

    pub fn error_reply() -> Self {
        Self::bot(ERROR_REPLY_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_messages_are_created_sent() {
        assert_eq!(ChatMessage::bot("hi").status, MessageStatus::Sent);
        assert_eq!(ChatMessage::greeting().status, MessageStatus::Sent);
        assert_eq!(ChatMessage::error_reply().sender, Sender::Bot);
    }

    #[test]
    fn user_messages_start_sending_with_unique_ids() {
        let a = ChatMessage::user("one");
        let b = ChatMessage::user("one");

        assert_eq!(a.status, MessageStatus::Sending);
        assert_eq!(a.sender, Sender::User);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn enums_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::greeting()).unwrap();
        assert_eq!(json["sender"], "bot");
        assert_eq!(json["status"], "sent");
        assert_eq!(json["id"], GREETING_ID);
    }
}
