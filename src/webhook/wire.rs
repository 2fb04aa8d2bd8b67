use crate::entity::{Identity, UserProfile};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PLAIN_TEXT_STATUS: &str = "success";
pub const EMPTY_BODY_MESSAGE: &str = "Webhook triggered successfully";

// Webhook payload types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub message: String,
    pub user: UserProfile,
    /// ISO-8601 with millisecond precision, e.g. `2026-10-19T08:15:30.120Z`.
    pub timestamp: String,
}

impl WebhookRequest {
    pub fn new(message: &str, identity: &Identity) -> Self {
        Self {
            message: message.to_string(),
            user: identity.profile(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Loosely typed JSON body as produced by the automation workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl WebhookResponse {
    /// Lenient extraction: non-object bodies give an empty response and
    /// scalar fields are rendered as text.
    pub fn from_value(value: &Value) -> Self {
        Self {
            output: text_field(value, "output"),
            message: text_field(value, "message"),
            status: text_field(value, "status"),
        }
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// What came back from a successful exchange, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookReply {
    Json(WebhookResponse),
    PlainText { status: String, body: String },
}

impl WebhookReply {
    pub fn plain_text(body: String) -> Self {
        let body = if body.is_empty() {
            EMPTY_BODY_MESSAGE.to_string()
        } else {
            body
        };
        WebhookReply::PlainText {
            status: PLAIN_TEXT_STATUS.to_string(),
            body,
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            WebhookReply::Json(response) => response.status.as_deref(),
            WebhookReply::PlainText { status, .. } => Some(status),
        }
    }

    /// `output`, then `message`, then empty. Empty strings fall through.
    pub fn into_reply_text(self) -> ReplyText {
        match self {
            WebhookReply::Json(response) => {
                let text = response
                    .output
                    .filter(|s| !s.is_empty())
                    .or(response.message.filter(|s| !s.is_empty()))
                    .unwrap_or_default();
                ReplyText::new(text)
            }
            WebhookReply::PlainText { body, .. } => ReplyText::new(body),
        }
    }
}

/// Normalised bot reply; the rest of the crate never looks at content types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyText(String);

impl ReplyText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
