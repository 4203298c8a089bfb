use std::time::{Duration, Instant};

use super::preserve::StickyScrollIntent;
use super::viewport::ScrollGeometry;
use super::ListConfig;
use crate::error::CommonResult;

/// Height of the proximity marker placed after the last row
pub const SENTINEL_HEIGHT: f32 = 1.0;

/// Identifies one fetch so late or duplicate completions can be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Work handed to the host when a load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoaderPhase {
    Idle,
    /// Fetch outstanding
    Loading {
        ticket: LoadTicket,
        intent: StickyScrollIntent,
    },
    /// Batch appended; waiting for layout before resolving scroll
    Settling {
        intent: StickyScrollIntent,
        until: Instant,
    },
    /// Ceiling reached; no further loads
    Disarmed,
}

/// Result of a sentinel trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Started(LoadRequest),
    /// A load is already in flight
    Busy,
    /// The ceiling has been reached
    Saturated,
    /// The reader has not scrolled yet and is not at the bottom
    Gated,
}

/// Suppresses loads on mount until the reader either scrolls or is
/// already parked at the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstLoadGate {
    user_scroll_threshold: f32,
    near_bottom_tolerance: f32,
    user_scrolled: bool,
}

impl FirstLoadGate {
    pub fn new(user_scroll_threshold: f32, near_bottom_tolerance: f32) -> Self {
        Self {
            user_scroll_threshold,
            near_bottom_tolerance,
            user_scrolled: false,
        }
    }

    /// Once an offset beyond the threshold is seen the gate stays open.
    pub fn note_scroll(&mut self, offset: f32) {
        if !self.user_scrolled && offset > self.user_scroll_threshold {
            tracing::debug!(offset, "first-load gate opened");
            self.user_scrolled = true;
        }
    }

    pub fn user_scrolled(&self) -> bool {
        self.user_scrolled
    }

    pub fn allows(&self, geometry: &ScrollGeometry) -> bool {
        self.user_scrolled || geometry.is_within_bottom(self.near_bottom_tolerance)
    }
}

/// Single-flight, saturating controller for appending batches.
#[derive(Debug, Clone)]
pub struct IncrementalLoader {
    batch_size: usize,
    ceiling: usize,
    settle_delay: Duration,
    gate: FirstLoadGate,
    phase: LoaderPhase,
    next_ticket: u64,
    total_loaded: usize,
}

impl IncrementalLoader {
    pub fn new(config: &ListConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            ceiling: config.ceiling,
            settle_delay: config.settle_delay(),
            gate: FirstLoadGate::new(config.user_scroll_threshold, config.gate_threshold),
            phase: LoaderPhase::Idle,
            next_ticket: 0,
            total_loaded: 0,
        }
    }

    pub fn phase(&self) -> LoaderPhase {
        self.phase
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Items appended by this loader since creation
    pub fn total_loaded(&self) -> usize {
        self.total_loaded
    }

    pub fn gate(&self) -> &FirstLoadGate {
        &self.gate
    }

    /// Loading or settling
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self.phase,
            LoaderPhase::Loading { .. } | LoaderPhase::Settling { .. }
        )
    }

    pub fn is_disarmed(&self) -> bool {
        self.phase == LoaderPhase::Disarmed
    }

    /// Whether `ticket` is the fetch currently outstanding
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        matches!(self.phase, LoaderPhase::Loading { ticket: current, .. } if current == ticket)
    }

    /// Handle a sentinel intersection. `source_count` is the size of the
    /// whole item source, not a filtered view of it.
    pub fn maybe_load_more(
        &mut self,
        source_count: usize,
        geometry: &ScrollGeometry,
        intent: StickyScrollIntent,
    ) -> Trigger {
        if self.is_disarmed() {
            return Trigger::Saturated;
        }
        if self.is_in_flight() {
            return Trigger::Busy;
        }
        if source_count >= self.ceiling {
            tracing::info!(count = source_count, ceiling = self.ceiling, "loader disarmed");
            self.phase = LoaderPhase::Disarmed;
            return Trigger::Saturated;
        }
        if !self.gate.allows(geometry) {
            return Trigger::Gated;
        }

        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.phase = LoaderPhase::Loading { ticket, intent };
        // Never request past the ceiling.
        let batch_size = self.batch_size.min(self.ceiling - source_count);
        tracing::debug!(
            ticket = ticket.0,
            batch_size,
            was_at_bottom = intent.was_at_bottom,
            "load started"
        );
        Trigger::Started(LoadRequest { ticket, batch_size })
    }

    /// Record the outcome of a fetch. On success the loader settles for the
    /// configured delay; on failure it returns straight to idle.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: CommonResult<usize>,
        source_count: usize,
        now: Instant,
    ) {
        let intent = match self.phase {
            LoaderPhase::Loading {
                ticket: current,
                intent,
            } if current == ticket => intent,
            _ => {
                tracing::debug!(ticket = ticket.0, "ignoring stale load completion");
                return;
            }
        };

        match result {
            Ok(appended) => {
                self.total_loaded += appended;
                tracing::debug!(ticket = ticket.0, appended, "load settling");
                self.phase = LoaderPhase::Settling {
                    intent,
                    until: now + self.settle_delay,
                };
            }
            Err(e) => {
                tracing::warn!(ticket = ticket.0, error = %e, "load failed");
                self.phase = self.resting_phase(source_count);
            }
        }
    }

    /// Finish settling once the delay has elapsed, handing back the captured
    /// scroll intent exactly once.
    pub fn poll_settled(
        &mut self,
        now: Instant,
        source_count: usize,
    ) -> Option<StickyScrollIntent> {
        match self.phase {
            LoaderPhase::Settling { intent, until } if now >= until => {
                self.phase = self.resting_phase(source_count);
                Some(intent)
            }
            _ => None,
        }
    }

    /// Deadline of the current settle period
    pub fn settle_deadline(&self) -> Option<Instant> {
        match self.phase {
            LoaderPhase::Settling { until, .. } => Some(until),
            _ => None,
        }
    }

    /// A scroll made by the reader: opens the gate and drops any pending
    /// stick-to-bottom intent.
    pub fn note_user_scroll(&mut self, offset: f32) {
        self.gate.note_scroll(offset);
        match &mut self.phase {
            LoaderPhase::Loading { intent, .. } | LoaderPhase::Settling { intent, .. } => {
                intent.cancel();
            }
            LoaderPhase::Idle | LoaderPhase::Disarmed => {}
        }
    }

    /// The item source was replaced. An outstanding load keeps running so
    /// single-flight holds, but it no longer scrolls anything.
    pub fn reset(&mut self, source_count: usize) {
        match &mut self.phase {
            LoaderPhase::Loading { intent, .. } | LoaderPhase::Settling { intent, .. } => {
                intent.cancel();
            }
            LoaderPhase::Idle | LoaderPhase::Disarmed => {
                self.phase = self.resting_phase(source_count);
            }
        }
    }

    fn resting_phase(&self, source_count: usize) -> LoaderPhase {
        if source_count >= self.ceiling {
            tracing::info!(count = source_count, ceiling = self.ceiling, "loader disarmed");
            LoaderPhase::Disarmed
        } else {
            LoaderPhase::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SentinelState {
    /// `None` until the first observation after arming
    Observing { last_visible: Option<bool> },
    Unobserved,
    RearmAt(Instant),
    Disconnected,
}

/// Edge detector standing in for a proximity observer on the sentinel.
///
/// Fires when the sentinel becomes visible, and on the first observation
/// after (re)arming if it is already visible.
#[derive(Debug, Clone)]
pub struct SentinelObserver {
    rearm_delay: Duration,
    state: SentinelState,
}

impl SentinelObserver {
    pub fn new(rearm_delay: Duration) -> Self {
        Self {
            rearm_delay,
            state: SentinelState::Observing { last_visible: None },
        }
    }

    pub fn observe(&mut self, visible: bool, now: Instant) -> bool {
        if let SentinelState::RearmAt(at) = self.state {
            if now < at {
                return false;
            }
            self.state = SentinelState::Observing { last_visible: None };
        }
        match &mut self.state {
            SentinelState::Observing { last_visible } => {
                let fired = visible && *last_visible != Some(true);
                *last_visible = Some(visible);
                fired
            }
            _ => false,
        }
    }

    pub fn is_observing(&self) -> bool {
        matches!(self.state, SentinelState::Observing { .. })
    }

    pub fn rearm_deadline(&self) -> Option<Instant> {
        match self.state {
            SentinelState::RearmAt(at) => Some(at),
            _ => None,
        }
    }

    pub fn unobserve(&mut self) {
        if self.state != SentinelState::Disconnected {
            self.state = SentinelState::Unobserved;
        }
    }

    pub fn rearm_after(&mut self, now: Instant) {
        if self.state != SentinelState::Disconnected {
            self.state = SentinelState::RearmAt(now + self.rearm_delay);
        }
    }

    pub fn rearm_now(&mut self) {
        self.state = SentinelState::Observing { last_visible: None };
    }

    pub fn disconnect(&mut self) {
        self.state = SentinelState::Disconnected;
    }
}
