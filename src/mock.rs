//! In-memory stand-in for a chat server.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use chatbook_common::list::BatchSource;
use chatbook_common::{sample, Chat, CommonError, CommonResult, Message};

use crate::config::MockConfig;

/// Serves generated conversations after an artificial delay and answers
/// every sent message with a delayed auto-reply.
#[derive(Debug, Clone)]
pub struct MockBackend {
    latency: Duration,
    failure_rate: f64,
    reply_delay: (Duration, Duration),
}

impl MockBackend {
    pub fn new(config: &MockConfig) -> Self {
        Self {
            latency: config.fetch_latency(),
            failure_rate: config.failure_rate.clamp(0.0, 1.0),
            reply_delay: config.reply_delay_range(),
        }
    }

    /// Conversations shown before anything is loaded
    pub fn initial_chats(&self, extra: usize) -> Vec<Chat> {
        sample::sample_chats(&mut rand::thread_rng(), extra)
    }

    /// Resolves to the bot's reply once a random delay has passed
    pub fn reply_to(&self, chat_id: String) -> impl Future<Output = Message> + Send + 'static {
        let (min, max) = self.reply_delay;
        let delay = sample::reply_delay(&mut rand::thread_rng(), min, max);
        async move {
            tokio::time::sleep(delay).await;
            sample::auto_reply(&chat_id)
        }
    }
}

impl BatchSource for MockBackend {
    type Item = Chat;

    fn fetch_batch(
        &self,
        n: usize,
    ) -> impl Future<Output = CommonResult<Vec<Chat>>> + Send + 'static {
        let latency = self.latency;
        let failure_rate = self.failure_rate;
        async move {
            tokio::time::sleep(latency).await;
            let mut rng = rand::thread_rng();
            if failure_rate > 0.0 && rng.gen_bool(failure_rate) {
                return Err(CommonError::FetchFailed(
                    "simulated network error".to_string(),
                ));
            }
            Ok(sample::load_batch(&mut rng, n))
        }
    }
}
