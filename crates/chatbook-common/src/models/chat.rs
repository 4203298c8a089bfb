use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::keyed::Keyed;
use super::message::Message;

/// Preview text for a conversation without messages
pub const EMPTY_PREVIEW: &str = "No messages";

/// A conversation and its messages, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the newest message, used as the list row subtitle
    pub fn preview(&self) -> &str {
        self.last_message()
            .map(|m| m.content.as_str())
            .unwrap_or(EMPTY_PREVIEW)
    }

    /// Case-insensitive match on the title or any message body.
    /// `needle` must already be lowercased and trimmed.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self
                .messages
                .iter()
                .any(|m| m.content.to_lowercase().contains(needle))
    }
}

impl Keyed for Chat {
    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sender;

    fn chat_with(content: &[&str]) -> Chat {
        let mut chat = Chat::new("chat-1".to_string(), "Project Nova".to_string());
        for (i, text) in content.iter().enumerate() {
            chat.messages.push(Message::new(
                format!("m{}", i),
                chat.id.clone(),
                Sender::Other,
                text.to_string(),
            ));
        }
        chat
    }

    #[test]
    fn test_preview_uses_last_message() {
        let chat = chat_with(&["first", "second"]);
        assert_eq!(chat.preview(), "second");
    }

    #[test]
    fn test_preview_empty_chat() {
        let chat = chat_with(&[]);
        assert_eq!(chat.preview(), EMPTY_PREVIEW);
    }

    #[test]
    fn test_matches_title_and_messages() {
        let chat = chat_with(&["Kickoff at 10 AM"]);
        assert!(chat.matches("nova"));
        assert!(chat.matches("kickoff"));
        assert!(!chat.matches("lunch"));
        assert!(chat.matches(""));
    }

    #[test]
    fn test_key_is_id() {
        let chat = chat_with(&[]);
        assert_eq!(chat.key(), "chat-1");
    }
}
