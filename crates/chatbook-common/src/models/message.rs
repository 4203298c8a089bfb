use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::keyed::Keyed;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Me,
    Other,
}

impl Sender {
    pub fn is_me(self) -> bool {
        self == Sender::Me
    }

    /// Short avatar text shown next to a message
    pub fn initials(self) -> &'static str {
        match self {
            Sender::Me => "You",
            Sender::Other => "B",
        }
    }

    /// Display name of the sender
    pub fn label(self) -> &'static str {
        match self {
            Sender::Me => "You",
            Sender::Other => "Bot",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender_id: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: String, chat_id: String, sender_id: Sender, content: String) -> Self {
        Self {
            id,
            chat_id,
            sender_id,
            content,
            created_at: Utc::now(),
        }
    }

    /// Local wall-clock time, e.g. "3:07 PM"
    pub fn time_label(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%-I:%M %p")
            .to_string()
    }
}

impl Keyed for Message {
    fn key(&self) -> &str {
        &self.id
    }
}
