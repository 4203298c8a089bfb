//! Mock conversation data used in place of a real backend.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::models::{Chat, Message, Sender};

/// Content of every simulated reply
pub const AUTO_REPLY: &str = "Auto-reply: got your message ✅";

const SENTENCES: [&str; 8] = [
    "Hey, how’s it going?",
    "Don’t forget the meeting tomorrow!",
    "Can you review this later?",
    "Looks good to me 👌",
    "Let’s sync after lunch.",
    "Auto-reply: received your message ✅",
    "Working on it now 💪",
    "Great job on the update!",
];

const TITLES: [&str; 9] = [
    "Team Alpha",
    "Weekend Plans",
    "Project Nova",
    "UI Revamp",
    "Crypto Chat",
    "Dev Squad",
    "Family Group",
    "Design Feedback",
    "Marketing Ideas",
];

/// Short random id suffix: the first 12 hex digits of a v4 UUID
pub fn unique_suffix() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(12);
    suffix
}

/// Fresh id such as `chat-3f9c0d1e2a4b`
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, unique_suffix())
}

fn random_sentence<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SENTENCES.choose(rng).copied().unwrap_or(SENTENCES[0])
}

fn random_title<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TITLES.choose(rng).copied().unwrap_or(TITLES[0])
}

fn random_chat<R: Rng + ?Sized>(rng: &mut R, id: String) -> Chat {
    let mut chat = Chat::new(id, random_title(rng).to_string());
    let count = rng.gen_range(1..=3);
    for j in 0..count {
        let sender = if j % 2 == 0 { Sender::Other } else { Sender::Me };
        chat.messages.push(Message::new(
            format!("m-{}-{}", chat.id, j),
            chat.id.clone(),
            sender,
            random_sentence(rng).to_string(),
        ));
    }
    chat
}

fn seeded_chat(id: &str, title: &str, message_id: &str, content: &str) -> Chat {
    let mut chat = Chat::new(id.to_string(), title.to_string());
    chat.messages.push(Message::new(
        message_id.to_string(),
        id.to_string(),
        Sender::Other,
        content.to_string(),
    ));
    chat
}

/// Two fixed conversations followed by `extra_count` random ones
pub fn sample_chats<R: Rng + ?Sized>(rng: &mut R, extra_count: usize) -> Vec<Chat> {
    let mut chats = vec![
        seeded_chat(
            "chat-1",
            "Personal",
            "m1",
            "Welcome! Try sending a message.",
        ),
        seeded_chat("chat-2", "Project X", "m2", "Kickoff at 10 AM"),
    ];
    chats.extend((0..extra_count).map(|i| random_chat(rng, format!("chat-{}", i + 3))));
    chats
}

/// Exactly `size` random conversations with suffixed ids, ready to append
/// to a list that may already hold earlier batches.
pub fn load_batch<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Vec<Chat> {
    (0..size)
        .map(|i| {
            let mut chat = random_chat(rng, format!("chat-{}", i + 3));
            let suffix = unique_suffix();
            chat.id = format!("{}-{}", chat.id, suffix);
            for msg in &mut chat.messages {
                msg.id = format!("{}-{}", msg.id, suffix);
                msg.chat_id = chat.id.clone();
            }
            chat
        })
        .collect()
}

/// The bot's answer to a message sent in `chat_id`
pub fn auto_reply(chat_id: &str) -> Message {
    Message::new(
        new_id("bot"),
        chat_id.to_string(),
        Sender::Other,
        AUTO_REPLY.to_string(),
    )
}

/// Uniform random delay in `[min, max]`
pub fn reply_delay<R: Rng + ?Sized>(rng: &mut R, min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_sample_chats_has_fixed_head() {
        let chats = sample_chats(&mut rng(), 5);
        assert_eq!(chats.len(), 7);
        assert_eq!(chats[0].title, "Personal");
        assert_eq!(chats[1].title, "Project X");
        assert_eq!(chats[2].id, "chat-3");
        assert_eq!(chats[6].id, "chat-7");
    }

    #[test]
    fn test_random_chats_alternate_senders() {
        let chats = sample_chats(&mut rng(), 20);
        for chat in &chats[2..] {
            assert!((1..=3).contains(&chat.messages.len()));
            assert_eq!(chat.messages[0].sender_id, Sender::Other);
            if let Some(second) = chat.messages.get(1) {
                assert_eq!(second.sender_id, Sender::Me);
            }
            assert!(chat.messages.iter().all(|m| m.chat_id == chat.id));
        }
    }

    #[test]
    fn test_load_batch_exact_size_and_unique_ids() {
        let mut rng = rng();
        let mut ids = HashSet::new();
        for _ in 0..5 {
            let batch = load_batch(&mut rng, 12);
            assert_eq!(batch.len(), 12);
            for chat in batch {
                assert!(ids.insert(chat.id.clone()), "duplicate id {}", chat.id);
                for msg in &chat.messages {
                    assert_eq!(msg.chat_id, chat.id);
                    assert!(msg.id.ends_with(chat.id.rsplit('-').next().unwrap()));
                }
            }
        }
    }

    #[test]
    fn test_auto_reply_shape() {
        let reply = auto_reply("chat-9");
        assert!(reply.id.starts_with("bot-"));
        assert_eq!(reply.id.len(), "bot-".len() + 12);
        assert_eq!(reply.chat_id, "chat-9");
        assert_eq!(reply.sender_id, Sender::Other);
        assert_eq!(reply.content, AUTO_REPLY);
    }

    #[test]
    fn test_reply_delay_within_bounds() {
        let mut rng = rng();
        let min = Duration::from_millis(600);
        let max = Duration::from_millis(1600);
        for _ in 0..100 {
            let d = reply_delay(&mut rng, min, max);
            assert!(d >= min && d <= max);
        }
        assert_eq!(reply_delay(&mut rng, max, min), max);
    }

    #[test]
    fn test_new_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| new_id("chat")).collect();
        assert_eq!(ids.len(), 1000);
        for id in &ids {
            assert_eq!(id.len(), "chat-".len() + 12);
            assert!(id["chat-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
