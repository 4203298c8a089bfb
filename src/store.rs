use chatbook_common::list::ItemSource;
use chatbook_common::{Chat, Message};

/// All conversations in display order plus the active selection.
#[derive(Debug, Clone, Default)]
pub struct ChatStore {
    chats: Vec<Chat>,
    active_id: Option<String>,
}

impl ChatStore {
    /// Store seeded with `chats`; the first one becomes active
    pub fn new(chats: Vec<Chat>) -> Self {
        let active_id = chats.first().map(|c| c.id.clone());
        Self { chats, active_id }
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chat> {
        self.chats.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.chats.iter().position(|c| c.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_chat(&self) -> Option<&Chat> {
        let id = self.active_id.as_deref()?;
        self.chats.iter().find(|c| c.id == id)
    }

    /// Add an empty conversation at the top and make it active
    pub fn create_chat(&mut self, id: String, title: String) {
        self.active_id = Some(id.clone());
        self.chats.insert(0, Chat::new(id, title));
    }

    pub fn append_chat(&mut self, chat: Chat) {
        self.chats.push(chat);
    }

    /// Remove a conversation. Deleting the active one activates whichever
    /// conversation is now first.
    pub fn delete_chat(&mut self, id: &str) -> Option<Chat> {
        let index = self.position(id)?;
        let removed = self.chats.remove(index);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.chats.first().map(|c| c.id.clone());
        }
        Some(removed)
    }

    pub fn set_active(&mut self, id: Option<String>) {
        self.active_id = id;
    }

    /// Append an outgoing message. Returns `false` for an unknown chat.
    pub fn send_message(&mut self, message: Message) -> bool {
        self.push_message(message)
    }

    /// Append an incoming message. Returns `false` for an unknown chat.
    pub fn receive_message(&mut self, message: Message) -> bool {
        self.push_message(message)
    }

    fn push_message(&mut self, message: Message) -> bool {
        match self.chats.iter_mut().find(|c| c.id == message.chat_id) {
            Some(chat) => {
                chat.messages.push(message);
                true
            }
            None => {
                tracing::debug!(chat_id = %message.chat_id, "message for unknown chat dropped");
                false
            }
        }
    }

    /// Indices of conversations matching `query` (case-insensitive, over
    /// titles and message bodies). A blank query matches everything.
    pub fn filter_indices(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        self.chats
            .iter()
            .enumerate()
            .filter(|(_, chat)| chat.matches(&needle))
            .map(|(i, _)| i)
            .collect()
    }
}

impl ItemSource for ChatStore {
    type Item = Chat;

    fn len(&self) -> usize {
        self.chats.len()
    }

    fn append(&mut self, batch: Vec<Chat>) {
        self.chats.extend(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbook_common::Sender;

    fn store() -> ChatStore {
        let mut personal = Chat::new("chat-1".into(), "Personal".into());
        personal.messages.push(Message::new(
            "m1".into(),
            "chat-1".into(),
            Sender::Other,
            "Welcome".into(),
        ));
        let project = Chat::new("chat-2".into(), "Project X".into());
        ChatStore::new(vec![personal, project])
    }

    fn msg(id: &str, chat_id: &str, content: &str) -> Message {
        Message::new(id.into(), chat_id.into(), Sender::Me, content.into())
    }

    #[test]
    fn test_first_chat_is_active() {
        let store = store();
        assert_eq!(store.active_id(), Some("chat-1"));
        assert_eq!(store.active_chat().unwrap().title, "Personal");
        assert_eq!(ChatStore::new(Vec::new()).active_id(), None);
    }

    #[test]
    fn test_create_chat_prepends_and_activates() {
        let mut store = store();
        store.create_chat("chat-new".into(), "Ideas".into());
        assert_eq!(store.chats()[0].id, "chat-new");
        assert_eq!(store.active_id(), Some("chat-new"));
        assert!(store.chats()[0].messages.is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_delete_active_activates_first_remaining() {
        let mut store = store();
        store.delete_chat("chat-1").unwrap();
        assert_eq!(store.active_id(), Some("chat-2"));

        store.delete_chat("chat-2").unwrap();
        assert_eq!(store.active_id(), None);
        assert!(store.delete_chat("chat-2").is_none());
    }

    #[test]
    fn test_delete_inactive_keeps_selection() {
        let mut store = store();
        store.delete_chat("chat-2");
        assert_eq!(store.active_id(), Some("chat-1"));
    }

    #[test]
    fn test_messages_route_by_chat_id() {
        let mut store = store();
        assert!(store.send_message(msg("a", "chat-2", "hello")));
        assert!(store.receive_message(msg("b", "chat-2", "hi back")));
        assert!(!store.send_message(msg("c", "missing", "lost")));
        let chat = &store.chats()[1];
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.preview(), "hi back");
    }

    #[test]
    fn test_filter_indices() {
        let store = store();
        assert_eq!(store.filter_indices(""), vec![0, 1]);
        assert_eq!(store.filter_indices("  PROJECT "), vec![1]);
        assert_eq!(store.filter_indices("welcome"), vec![0]);
        assert!(store.filter_indices("zzz").is_empty());
    }

    #[test]
    fn test_append_as_item_source() {
        let mut store = store();
        store.append(vec![Chat::new("chat-3".into(), "Dev Squad".into())]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.position("chat-3"), Some(2));
        store.append_chat(Chat::new("chat-4".into(), "UI Revamp".into()));
        assert_eq!(store.get(3).unwrap().title, "UI Revamp");
    }
}
