use std::future::Future;
use std::time::{Duration, Instant};

use super::loader::{
    IncrementalLoader, LoadRequest, LoadTicket, SentinelObserver, Trigger, SENTINEL_HEIGHT,
};
use super::preserve::{ScrollPreserver, SmoothScroll};
use super::viewport::{ScrollGeometry, ViewportTracker};
use super::window::{Range, Window, WindowingEngine};
use super::ListConfig;
use crate::error::CommonResult;
use crate::models::Keyed;

/// Externally owned, ordered sequence the list windows over.
pub trait ItemSource {
    type Item: Keyed;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn append(&mut self, batch: Vec<Self::Item>);
}

/// Asynchronous producer of new items.
pub trait BatchSource {
    type Item: Keyed + Send + 'static;

    fn fetch_batch(
        &self,
        n: usize,
    ) -> impl Future<Output = CommonResult<Vec<Self::Item>>> + Send + 'static;
}

/// What a frame changed, for the host to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    /// The rendered range moved
    pub range_changed: bool,
    /// The surface moved the scroll offset itself
    pub scrolled: bool,
    /// A fetch the host must start
    pub load: Option<LoadRequest>,
}

/// Composition root: owns the scroll position and drives the tracker,
/// engine, loader and preserver once per frame.
#[derive(Debug, Clone)]
pub struct ListSurface {
    config: ListConfig,
    tracker: ViewportTracker,
    engine: WindowingEngine,
    loader: IncrementalLoader,
    sentinel: SentinelObserver,
    preserver: ScrollPreserver,
    scroll_offset: f32,
    animation: Option<SmoothScroll>,
    visible_count: usize,
}

impl ListSurface {
    pub fn new(config: ListConfig) -> Self {
        let row_height = config.effective_row_height();
        Self {
            tracker: ViewportTracker::new(config.resize_hysteresis),
            engine: WindowingEngine::new(row_height, config.overscan),
            loader: IncrementalLoader::new(&config),
            sentinel: SentinelObserver::new(config.rearm_delay()),
            preserver: ScrollPreserver::new(config.bottom_threshold),
            scroll_offset: 0.0,
            animation: None,
            visible_count: 0,
            config,
        }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn loader(&self) -> &IncrementalLoader {
        &self.loader
    }

    pub fn row_height(&self) -> f32 {
        self.engine.row_height()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> f32 {
        self.tracker.latest_height()
    }

    pub fn window(&self) -> Window {
        self.engine.window()
    }

    pub fn range(&self) -> Range {
        self.engine.range()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_in_flight()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether another frame should run without waiting for input
    pub fn needs_frame(&self) -> bool {
        self.animation.is_some() || self.tracker.has_pending()
    }

    /// How long the host may wait for input before the next frame is due.
    /// `None` means nothing is scheduled.
    pub fn next_frame_in(&self, now: Instant, frame_interval: Duration) -> Option<Duration> {
        if self.needs_frame() {
            return Some(frame_interval);
        }
        [self.loader.settle_deadline(), self.sentinel.rearm_deadline()]
            .into_iter()
            .flatten()
            .min()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Rows plus the trailing sentinel
    pub fn content_height(&self) -> f32 {
        self.visible_count as f32 * self.row_height() + SENTINEL_HEIGHT
    }

    pub fn geometry(&self) -> ScrollGeometry {
        ScrollGeometry {
            scroll_offset: self.scroll_offset,
            viewport_height: self.tracker.latest_height(),
            scroll_height: self.content_height(),
        }
    }

    /// Slice of `items` inside the current range
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range().clamp_to(items.len());
        &items[range.start..range.end]
    }

    pub fn resize(&mut self, viewport_height: f32) {
        self.tracker.observe_size(viewport_height);
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.user_scroll_to(self.scroll_offset + delta);
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.user_scroll_to(offset);
    }

    pub fn scroll_to_top(&mut self) {
        self.user_scroll_to(0.0);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.user_scroll_to(self.geometry().max_offset());
    }

    /// Scroll just enough for row `index` to be fully visible
    pub fn scroll_into_view(&mut self, index: usize) {
        let top = index as f32 * self.row_height();
        let bottom = top + self.row_height();
        let viewport = self.tracker.latest_height();
        if top < self.scroll_offset {
            self.user_scroll_to(top);
        } else if bottom > self.scroll_offset + viewport {
            self.user_scroll_to(bottom - viewport);
        }
    }

    /// Length of the windowed sequence changed outside a frame (a load
    /// landed, a row was added or removed). Scroll clamping uses it at once.
    pub fn set_len(&mut self, visible_count: usize) {
        self.visible_count = visible_count;
    }

    fn user_scroll_to(&mut self, offset: f32) {
        self.animation = None;
        let clamped = offset.clamp(0.0, self.geometry().max_offset());
        if clamped == self.scroll_offset {
            return;
        }
        self.scroll_offset = clamped;
        self.tracker.observe_scroll(clamped);
        self.loader.note_user_scroll(clamped);
    }

    fn programmatic_scroll_to(&mut self, offset: f32) {
        self.scroll_offset = offset;
        self.tracker.observe_scroll(offset);
    }

    /// Run one frame. `source` is the full item source and decides the
    /// ceiling; `visible_count` is the length of the (possibly filtered)
    /// sequence actually being windowed.
    pub fn frame<S: ItemSource>(
        &mut self,
        source: &S,
        visible_count: usize,
        now: Instant,
    ) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        self.visible_count = visible_count;

        if let Some(anim) = self.animation.as_mut() {
            let position = anim.tick();
            if anim.is_done() {
                self.animation = None;
            }
            self.programmatic_scroll_to(position);
            outcome.scrolled = true;
        }

        let max_offset = self.geometry().max_offset();
        if self.scroll_offset > max_offset {
            self.programmatic_scroll_to(max_offset);
            outcome.scrolled = true;
        }

        self.tracker.on_frame();
        let measurement = self.tracker.measurement();
        outcome.range_changed = self
            .engine
            .recompute(measurement.scroll_offset, measurement.viewport_height, visible_count)
            .is_changed();

        if let Some(intent) = self.loader.poll_settled(now, source.len()) {
            if let Some(target) = self.preserver.resolve(intent, &self.geometry()) {
                if target != self.scroll_offset {
                    tracing::debug!(from = self.scroll_offset, to = target, "following new tail");
                    self.animation = Some(SmoothScroll::new(self.scroll_offset, target));
                }
            }
            if self.loader.is_disarmed() {
                self.sentinel.disconnect();
            } else {
                self.sentinel.rearm_after(now);
            }
        }

        let geometry = self.geometry();
        if self.sentinel.observe(geometry.sentinel_visible(), now) {
            let intent = self.preserver.capture(&geometry);
            match self.loader.maybe_load_more(source.len(), &geometry, intent) {
                Trigger::Started(request) => {
                    self.sentinel.unobserve();
                    outcome.load = Some(request);
                }
                Trigger::Saturated => self.sentinel.disconnect(),
                Trigger::Busy | Trigger::Gated => {}
            }
        }

        outcome
    }

    /// Apply a finished fetch. Returns the number of items appended, or
    /// the fetch error so the host can report it.
    pub fn complete_load<S: ItemSource>(
        &mut self,
        source: &mut S,
        ticket: LoadTicket,
        result: CommonResult<Vec<S::Item>>,
        now: Instant,
    ) -> CommonResult<usize> {
        if !self.loader.is_current(ticket) {
            tracing::debug!(ticket = ticket.id(), "dropping result of stale load");
            return Ok(0);
        }
        match result {
            Ok(mut batch) => {
                let room = self.loader.ceiling().saturating_sub(source.len());
                batch.truncate(room);
                let appended = batch.len();
                source.append(batch);
                tracing::info!(appended, total = source.len(), "batch appended");
                self.loader.complete(ticket, Ok(appended), source.len(), now);
                Ok(appended)
            }
            Err(e) => {
                self.loader.complete(ticket, Err(e.clone()), source.len(), now);
                if self.loader.is_disarmed() {
                    self.sentinel.disconnect();
                } else {
                    self.sentinel.rearm_after(now);
                }
                Err(e)
            }
        }
    }

    /// The windowed sequence was swapped for another (e.g. a new search
    /// filter). Scrolls to the top and starts observing afresh.
    pub fn replace_source(&mut self, source_len: usize, visible_count: usize) {
        self.animation = None;
        self.visible_count = visible_count;
        self.programmatic_scroll_to(0.0);
        self.engine.reset();
        self.loader.reset(source_len);
        if self.loader.is_disarmed() {
            self.sentinel.disconnect();
        } else if !self.loader.is_in_flight() {
            self.sentinel.rearm_now();
        }
        tracing::debug!(source_len, visible_count, "list source replaced");
    }
}
