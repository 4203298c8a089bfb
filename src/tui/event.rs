use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind, MouseEvent};

use chatbook_common::list::LoadTicket;
use chatbook_common::{Chat, CommonError, CommonResult, Message};

use crate::error::{ChatbookError, Result};

/// Everything the UI loop reacts to
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Mouse wheel and clicks
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Periodic tick for timers and animation
    Tick,
    /// A batch fetch finished, failed or was dropped
    BatchLoaded {
        ticket: LoadTicket,
        result: CommonResult<Vec<Chat>>,
    },
    /// The mock backend answered a message
    ReplyReceived(Message),
}

/// Terminal input on a background thread plus a sender for async tasks,
/// all merged into one channel.
pub struct EventHandler {
    sender: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Create a new event handler that ticks every `tick_rate` when idle
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        let input = sender.clone();

        let handler = thread::spawn(move || loop {
            let forwarded = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        input.send(Event::Key(key))
                    }
                    Ok(event::Event::Mouse(mouse)) => input.send(Event::Mouse(mouse)),
                    Ok(event::Event::Resize(width, height)) => {
                        input.send(Event::Resize(width, height))
                    }
                    _ => Ok(()),
                }
            } else {
                input.send(Event::Tick)
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self {
            sender,
            receiver,
            handler,
        }
    }

    /// Sender for work that completes off the UI thread
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.sender.clone()
    }

    /// Get the next event, blocking until one is available
    pub fn next(&self) -> Result<Event> {
        self.receiver
            .recv()
            .map_err(|e| ChatbookError::Tui(e.to_string()))
    }

    /// Wait at most `timeout` for the next event. `None` waits for as
    /// long as it takes.
    pub fn next_timeout(&self, timeout: Option<Duration>) -> Result<Option<Event>> {
        let Some(timeout) = timeout else {
            return self.next().map(Some);
        };
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(e) => Err(ChatbookError::Tui(e.to_string())),
        }
    }

    /// Events already queued, without blocking
    pub fn drain(&self) -> impl Iterator<Item = Event> + '_ {
        self.receiver.try_iter()
    }
}

/// Reports the outcome of one batch fetch back to the UI loop.
///
/// Dropping it unfinished, e.g. when the task is cancelled at shutdown,
/// still reports an aborted fetch so the loader never stays in flight.
pub struct LoadCompletion {
    sender: mpsc::Sender<Event>,
    ticket: LoadTicket,
    finished: bool,
}

impl LoadCompletion {
    pub fn new(sender: mpsc::Sender<Event>, ticket: LoadTicket) -> Self {
        Self {
            sender,
            ticket,
            finished: false,
        }
    }

    pub fn finish(mut self, result: CommonResult<Vec<Chat>>) {
        self.finished = true;
        self.post(result);
    }

    fn post(&self, result: CommonResult<Vec<Chat>>) {
        // The loop may already be gone during shutdown.
        let _ = self.sender.send(Event::BatchLoaded {
            ticket: self.ticket,
            result,
        });
    }
}

impl Drop for LoadCompletion {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(ticket = self.ticket.id(), "load task dropped before finishing");
            self.post(Err(CommonError::FetchAborted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ChatStore;
    use chatbook_common::list::{ListConfig, ListSurface};

    /// Tickets are only minted by a loader; an empty list loads on mount.
    fn ticket() -> LoadTicket {
        let mut surface = ListSurface::new(ListConfig::default());
        surface.resize(400.0);
        let outcome = surface.frame(&ChatStore::default(), 0, std::time::Instant::now());
        outcome.load.unwrap().ticket
    }

    #[test]
    fn test_finish_posts_once() {
        let (tx, rx) = mpsc::channel();
        let completion = LoadCompletion::new(tx, ticket());
        completion.finish(Ok(Vec::new()));
        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            Event::BatchLoaded { result: Ok(batch), .. } if batch.is_empty()
        ));
    }

    #[test]
    fn test_drop_reports_abort() {
        let (tx, rx) = mpsc::channel();
        drop(LoadCompletion::new(tx, ticket()));
        match rx.try_recv() {
            Ok(Event::BatchLoaded { result, .. }) => {
                assert_eq!(result.unwrap_err(), CommonError::FetchAborted)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cancelled_task_still_reports() {
        let (tx, rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let completion = LoadCompletion::new(tx, ticket());
        runtime.spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            completion.finish(Ok(Vec::new()));
        });
        drop(runtime);
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::BatchLoaded {
                result: Err(CommonError::FetchAborted),
                ..
            })
        ));
    }
}
