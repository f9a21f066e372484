//! Inbound/outbound message shapes and the persisted message log record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized inbound event extracted from the webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender channel address.
    pub from: String,
    pub text: Option<String>,
    /// Selected button/list identifier for interactive replies.
    pub button_id: Option<String>,
}

impl InboundMessage {
    pub fn text(from: &str, text: &str) -> Self {
        Self {
            from: from.to_string(),
            text: Some(text.to_string()),
            button_id: None,
        }
    }

    pub fn button(from: &str, button_id: &str) -> Self {
        Self {
            from: from.to_string(),
            text: None,
            button_id: Some(button_id.to_string()),
        }
    }

    /// Effective input payload: a button selection takes precedence over
    /// body text. Trimmed; empty means no usable input.
    pub fn input(&self) -> &str {
        self.button_id
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or("")
            .trim()
    }
}

/// An interactive reply button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub title: String,
}

impl Button {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

/// An outbound reply: plain text, or text plus interactive buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub to: String,
    pub text: String,
    pub buttons: Vec<Button>,
}

impl Reply {
    pub fn text(to: &str, text: impl Into<String>) -> Self {
        Self {
            to: to.to_string(),
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn buttons(to: &str, text: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self {
            to: to.to_string(),
            text: text.into(),
            buttons,
        }
    }

    pub fn is_interactive(&self) -> bool {
        !self.buttons.is_empty()
    }
}

/// Direction of a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        }
    }
}

/// One row of the per-business message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub business_id: i64,
    pub customer_id: i64,
    pub direction: Direction,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
