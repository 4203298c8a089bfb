use std::sync::mpsc;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use tokio::runtime::Handle;

use chatbook_common::list::{BatchSource, ListSurface, LoadRequest, LoadTicket};
use chatbook_common::{sample, Chat, CommonResult, Message, Sender};

use crate::config::Config;
use crate::error::Result;
use crate::mock::MockBackend;
use crate::store::ChatStore;

use super::actions;
use super::event::{Event, LoadCompletion};
use super::input_handler::TextField;
use super::theme::TuiTheme;
use super::ui::{screen_layout, ScreenLayout};
use super::widgets::message_view;

/// Main application state
pub struct App {
    /// Conversations and the active selection
    pub store: ChatStore,
    /// Windowing and incremental loading for the conversation list
    pub list: ListSurface,
    /// Store indices of the rows being listed, after search filtering
    pub visible: Vec<usize>,
    /// Cursor position within `visible`
    pub cursor: usize,
    pub focus: Focus,
    pub search: SearchState,
    /// Message being written
    pub composer: TextField,
    /// Lines scrolled up from the newest message
    pub message_scroll: u16,
    /// Active popup/dialog state
    pub popup: Option<PopupState>,
    /// Status message (success/error feedback)
    pub status_message: Option<StatusMessage>,
    /// Application running flag
    pub running: bool,
    /// Theme colors for rendering
    pub theme: TuiTheme,
    pub config: Config,
    /// Last computed screen layout
    pub layout: ScreenLayout,
    backend: MockBackend,
    runtime: Handle,
    events: mpsc::Sender<Event>,
    /// Active chat and message count the message pane last saw
    message_marker: (Option<String>, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Composer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupState {
    Help,
    NewChat { input: TextField },
    ConfirmDelete { id: String, title: String },
}

/// Search overlay. Edits take effect after the debounce delay.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub open: bool,
    pub input: TextField,
    /// Lowercased query currently filtering the list
    pub applied: String,
    pending_since: Option<Instant>,
}

impl SearchState {
    pub fn is_filtering(&self) -> bool {
        !self.applied.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Info,
}

impl App {
    pub fn new(config: Config, runtime: Handle, events: mpsc::Sender<Event>) -> Self {
        let backend = MockBackend::new(&config.mock);
        let store = ChatStore::new(backend.initial_chats(config.mock.initial_chats));
        let visible = (0..store.len()).collect();
        let theme = TuiTheme::from(&config.theme.resolve());
        tracing::info!(chats = store.len(), "starting with sample conversations");

        let mut list = ListSurface::new(config.list);
        list.set_len(store.len());

        Self {
            list,
            store,
            visible,
            cursor: 0,
            focus: Focus::List,
            search: SearchState::default(),
            composer: TextField::new(),
            message_scroll: 0,
            popup: None,
            status_message: None,
            running: true,
            theme,
            config,
            layout: ScreenLayout::default(),
            backend,
            runtime,
            events,
            message_marker: (None, 0),
        }
    }

    pub fn on_resize(&mut self, area: Rect) {
        self.layout = screen_layout(area);
        self.list.resize(f32::from(self.layout.list.height));
        self.message_scroll = self.message_scroll.min(self.max_message_scroll());
    }

    /// One pass of timers and list bookkeeping, run before every draw
    pub fn frame(&mut self, now: Instant) {
        self.apply_search_if_due(now);
        self.follow_new_messages();
        let outcome = self.list.frame(&self.store, self.visible.len(), now);
        if let Some(request) = outcome.load {
            self.spawn_load(request);
        }
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) -> Result<()> {
        match event {
            Event::Key(key) => actions::handle_key_event(self, key, now)?,
            Event::Mouse(mouse) => actions::handle_mouse_event(self, mouse),
            Event::Resize(width, height) => self.on_resize(Rect::new(0, 0, width, height)),
            Event::Tick => self.tick(),
            Event::BatchLoaded { ticket, result } => self.on_batch_loaded(ticket, result, now),
            Event::ReplyReceived(message) => self.on_reply(message),
        }
        Ok(())
    }

    fn spawn_load(&self, request: LoadRequest) {
        let fetch = self.backend.fetch_batch(request.batch_size);
        let completion = LoadCompletion::new(self.events.clone(), request.ticket);
        self.runtime.spawn(async move {
            completion.finish(fetch.await);
        });
    }

    fn on_batch_loaded(
        &mut self,
        ticket: LoadTicket,
        result: CommonResult<Vec<Chat>>,
        now: Instant,
    ) {
        let selected_id = self.selected_id();
        let loaded = self.list.complete_load(&mut self.store, ticket, result, now);
        self.refresh_view(selected_id);
        if let Err(e) = loaded {
            self.set_status(format!("Could not load more chats: {}", e), StatusKind::Error);
        }
    }

    fn on_reply(&mut self, message: Message) {
        self.update_store(|store| store.receive_message(message));
    }

    /// Apply `change` to the store, then recompute the listed rows. The
    /// cursor stays on the conversation it was on when that is still listed.
    pub fn update_store<R>(&mut self, change: impl FnOnce(&mut ChatStore) -> R) -> R {
        let selected_id = self.selected_id();
        let result = change(&mut self.store);
        self.refresh_view(selected_id);
        result
    }

    fn refresh_view(&mut self, selected_id: Option<String>) {
        self.visible = self.store.filter_indices(&self.search.applied);
        self.list.set_len(self.visible.len());
        let last = self.visible.len().saturating_sub(1);
        self.cursor = selected_id
            .and_then(|id| self.visible_position(&id))
            .unwrap_or_else(|| self.cursor.min(last));
    }

    /// The listed sequence changed identity: scroll to the top and reset
    /// the loader.
    fn replace_source(&mut self) {
        self.visible = self.store.filter_indices(&self.search.applied);
        self.cursor = 0;
        self.list.replace_source(self.store.len(), self.visible.len());
    }

    fn visible_position(&self, id: &str) -> Option<usize> {
        self.visible
            .iter()
            .position(|&i| self.store.get(i).is_some_and(|c| c.id == id))
    }

    pub fn selected_chat(&self) -> Option<&Chat> {
        self.visible.get(self.cursor).and_then(|&i| self.store.get(i))
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_chat().map(|c| c.id.clone())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.list.scroll_into_view(self.cursor);
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
        self.list.scroll_to_top();
    }

    pub fn select_last(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.cursor = self.visible.len() - 1;
        self.list.scroll_to_bottom();
    }

    /// Rows that fit in the list viewport
    pub fn page_rows(&self) -> isize {
        let rows = self.list.viewport_height() / self.list.row_height();
        (rows.floor() as isize).max(1)
    }

    /// Select the row at `index` within `visible` and open it
    pub fn pick(&mut self, index: usize) {
        if index < self.visible.len() {
            self.cursor = index;
            self.list.scroll_into_view(index);
            self.activate_selected();
        }
    }

    pub fn activate_selected(&mut self) {
        let id = self.selected_chat().map(|c| c.id.clone());
        if id.is_some() {
            self.store.set_active(id);
        }
    }

    pub fn create_chat(&mut self, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            return;
        }
        let id = sample::new_id("chat");
        self.update_store(|store| store.create_chat(id.clone(), title.to_string()));
        if let Some(position) = self.visible_position(&id) {
            self.cursor = position;
            self.list.scroll_into_view(position);
        }
        tracing::debug!(%id, "chat created");
        self.set_status(format!("Created \"{}\"", title), StatusKind::Success);
    }

    pub fn request_delete(&mut self) {
        if let Some(chat) = self.selected_chat() {
            self.popup = Some(PopupState::ConfirmDelete {
                id: chat.id.clone(),
                title: chat.title.clone(),
            });
        }
    }

    pub fn delete_chat(&mut self, id: &str) {
        if let Some(chat) = self.update_store(|store| store.delete_chat(id)) {
            self.set_status(format!("Deleted \"{}\"", chat.title), StatusKind::Info);
        }
    }

    /// Send the composer contents to the active chat and schedule the reply
    pub fn send_message(&mut self) {
        if self.composer.is_blank() {
            return;
        }
        let Some(chat_id) = self.store.active_id().map(str::to_string) else {
            self.set_status("No chat selected".to_string(), StatusKind::Error);
            return;
        };
        let text = self.composer.take();
        let id = sample::new_id("m");
        let message = Message::new(id, chat_id.clone(), Sender::Me, text.trim().to_string());
        if !self.update_store(|store| store.send_message(message)) {
            return;
        }

        let reply = self.backend.reply_to(chat_id);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let _ = events.send(Event::ReplyReceived(reply.await));
        });
    }

    pub fn open_search(&mut self) {
        self.search.open = true;
    }

    pub fn on_search_edited(&mut self, now: Instant) {
        self.search.pending_since = Some(now);
    }

    /// Close the overlay. `clear` also drops the filter.
    pub fn close_search(&mut self, clear: bool) {
        self.search.open = false;
        if clear {
            self.search.input.clear();
            self.search.pending_since = None;
            if self.search.is_filtering() {
                self.search.applied.clear();
                self.replace_source();
            }
        }
    }

    fn apply_search_if_due(&mut self, now: Instant) {
        let Some(since) = self.search.pending_since else {
            return;
        };
        if now.duration_since(since) >= self.config.search_debounce() {
            self.apply_search();
        }
    }

    /// Filter by the current search input without waiting for the debounce
    pub fn apply_search(&mut self) {
        self.search.pending_since = None;
        let query = self.search.input.value().trim().to_lowercase();
        if query != self.search.applied {
            tracing::debug!(%query, "search applied");
            self.search.applied = query;
            self.replace_source();
        }
    }

    /// Jump the message pane back to the newest message whenever the
    /// active chat or its message count changes.
    fn follow_new_messages(&mut self) {
        let marker = (
            self.store.active_id().map(str::to_string),
            self.store.active_chat().map_or(0, |c| c.messages.len()),
        );
        if marker != self.message_marker {
            self.message_marker = marker;
            self.message_scroll = 0;
        }
    }

    pub fn max_message_scroll(&self) -> u16 {
        let Some(chat) = self.store.active_chat() else {
            return 0;
        };
        let area = self.layout.messages;
        let lines = message_view::message_lines(chat, area.width, &self.theme).len();
        u16::try_from(lines.saturating_sub(usize::from(area.height))).unwrap_or(u16::MAX)
    }

    pub fn scroll_messages(&mut self, delta: i32) {
        let next = i32::from(self.message_scroll) + delta;
        self.message_scroll = next.clamp(0, i32::from(self.max_message_scroll())) as u16;
    }

    /// Set status message
    pub fn set_status(&mut self, text: String, kind: StatusKind) {
        self.status_message = Some(StatusMessage {
            text,
            kind,
            expires_at: Instant::now() + Duration::from_secs(3),
        });
    }

    pub fn tick(&mut self) {
        // Clear expired status messages
        if let Some(ref msg) = self.status_message {
            if Instant::now() >= msg.expires_at {
                self.status_message = None;
            }
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chatbook_common::CommonError;

    pub(crate) struct Harness {
        pub app: App,
        pub events: mpsc::Receiver<Event>,
        _runtime: tokio::runtime::Runtime,
    }

    pub(crate) fn harness() -> Harness {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(Config::default(), runtime.handle().clone(), tx);
        app.on_resize(Rect::new(0, 0, 100, 40));
        Harness {
            app,
            events: rx,
            _runtime: runtime,
        }
    }

    #[test]
    fn test_initial_state() {
        let h = harness();
        let app = &h.app;
        assert_eq!(app.store.len(), 14);
        assert_eq!(app.visible.len(), 14);
        assert_eq!(app.store.active_chat().unwrap().title, "Personal");
        assert_eq!(app.selected_chat().unwrap().title, "Personal");
        assert!(app.layout.list.height > 0);
    }

    #[test]
    fn test_send_message_appends_to_active_chat() {
        let mut h = harness();
        let app = &mut h.app;
        for c in "  hi there ".chars() {
            app.composer
                .handle_key(crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char(c)));
        }
        app.send_message();
        let chat = app.store.active_chat().unwrap();
        assert_eq!(chat.messages.last().unwrap().content, "hi there");
        assert_eq!(chat.messages.last().unwrap().sender_id, Sender::Me);
        assert!(app.composer.value().is_empty());

        // Blank input is ignored
        let count = app.store.active_chat().unwrap().messages.len();
        app.send_message();
        assert_eq!(app.store.active_chat().unwrap().messages.len(), count);
    }

    #[test]
    fn test_reply_event_lands_in_chat() {
        let mut h = harness();
        let app = &mut h.app;
        let reply = Message::new("bot-1".into(), "chat-2".into(), Sender::Other, "ok".into());
        app.handle_event(Event::ReplyReceived(reply), Instant::now()).unwrap();
        assert_eq!(app.store.get(1).unwrap().preview(), "ok");
    }

    #[test]
    fn test_search_is_debounced() {
        let mut h = harness();
        let app = &mut h.app;
        let now = Instant::now();
        app.frame(now);
        app.open_search();
        for c in "project x".chars() {
            app.search
                .input
                .handle_key(crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char(c)));
        }
        app.on_search_edited(now);

        app.frame(now + Duration::from_millis(100));
        assert_eq!(app.visible.len(), 14);

        app.frame(now + Duration::from_millis(250));
        assert!(app.search.is_filtering());
        assert!(app.visible.iter().all(|&i| app.store.get(i).unwrap().matches("project x")));
        assert_eq!(app.store.get(app.visible[0]).unwrap().title, "Project X");
        assert_eq!(app.list.scroll_offset(), 0.0);

        app.close_search(true);
        assert_eq!(app.visible.len(), 14);
    }

    #[test]
    fn test_create_chat_selects_it() {
        let mut h = harness();
        let app = &mut h.app;
        app.move_cursor(3);
        app.create_chat("  Ideas ");
        assert_eq!(app.store.chats()[0].title, "Ideas");
        assert!(app.store.chats()[0].id.starts_with("chat-"));
        assert_eq!(app.cursor, 0);
        assert_eq!(app.store.active_id(), Some(app.store.chats()[0].id.as_str()));

        app.create_chat("   ");
        assert_eq!(app.store.len(), 15);
    }

    #[test]
    fn test_refresh_keeps_cursor_on_same_chat() {
        let mut h = harness();
        let app = &mut h.app;
        app.move_cursor(2);
        let id = app.selected_chat().unwrap().id.clone();
        app.update_store(|store| store.create_chat("chat-top".into(), "Top".into()));
        assert_eq!(app.selected_chat().unwrap().id, id);
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn test_delete_above_cursor_keeps_selection() {
        let mut h = harness();
        let app = &mut h.app;
        app.move_cursor(4);
        let id = app.selected_chat().unwrap().id.clone();
        let above = app.store.get(app.visible[1]).unwrap().id.clone();
        app.delete_chat(&above);
        assert_eq!(app.selected_chat().unwrap().id, id);
        assert_eq!(app.cursor, 3);

        // The selected chat itself: the cursor stays at the same row
        app.delete_chat(&id);
        assert_eq!(app.cursor, 3);
        assert_eq!(app.visible.len(), 12);
    }

    #[test]
    fn test_scroll_right_after_load_reaches_new_rows() {
        let mut h = harness();
        let app = &mut h.app;
        let now = Instant::now();
        app.frame(now);
        app.select_last();
        app.frame(now);
        let before = app.list.scroll_offset();
        let ticket = match app.list.loader().phase() {
            chatbook_common::list::LoaderPhase::Loading { ticket, .. } => ticket,
            other => panic!("unexpected phase {:?}", other),
        };
        let batch = sample::load_batch(&mut rand::thread_rng(), 12);
        app.handle_event(Event::BatchLoaded { ticket, result: Ok(batch) }, now)
            .unwrap();

        // Handled in the same drain as the load, before any frame
        let row = app.list.row_height();
        app.list.scroll_by(row);
        assert_eq!(app.list.scroll_offset(), before + row);
    }

    #[test]
    fn test_delete_chat() {
        let mut h = harness();
        let app = &mut h.app;
        app.request_delete();
        let Some(PopupState::ConfirmDelete { id, title }) = app.popup.clone() else {
            panic!("expected a delete confirmation");
        };
        assert_eq!(title, "Personal");
        app.delete_chat(&id);
        assert_eq!(app.store.len(), 13);
        assert_eq!(app.store.active_chat().unwrap().title, "Project X");
    }

    #[test]
    fn test_failed_load_sets_error_status() {
        let mut h = harness();
        let app = &mut h.app;
        let now = Instant::now();
        app.frame(now);
        app.select_last();
        app.frame(now);
        assert!(app.list.is_loading());

        let ticket = match app.list.loader().phase() {
            chatbook_common::list::LoaderPhase::Loading { ticket, .. } => ticket,
            other => panic!("unexpected phase {:?}", other),
        };
        app.handle_event(
            Event::BatchLoaded {
                ticket,
                result: Err(CommonError::FetchFailed("offline".into())),
            },
            now,
        )
        .unwrap();
        assert!(!app.list.is_loading());
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("offline"));
    }

    #[test]
    fn test_loaded_batch_extends_list() {
        let mut h = harness();
        let app = &mut h.app;
        let now = Instant::now();
        app.frame(now);
        app.select_last();
        app.frame(now);
        let ticket = match app.list.loader().phase() {
            chatbook_common::list::LoaderPhase::Loading { ticket, .. } => ticket,
            other => panic!("unexpected phase {:?}", other),
        };
        let batch = sample::load_batch(&mut rand::thread_rng(), 12);
        app.handle_event(Event::BatchLoaded { ticket, result: Ok(batch) }, now)
            .unwrap();
        assert_eq!(app.store.len(), 26);
        assert_eq!(app.visible.len(), 26);
        assert_eq!(app.cursor, 13);
    }

    #[test]
    fn test_message_scroll_resets_on_new_message() {
        let mut h = harness();
        let app = &mut h.app;
        let now = Instant::now();
        app.frame(now);
        app.message_scroll = 5;
        let reply = Message::new("bot-2".into(), "chat-1".into(), Sender::Other, "new".into());
        app.handle_event(Event::ReplyReceived(reply), now).unwrap();
        app.frame(now);
        assert_eq!(app.message_scroll, 0);
    }
}
