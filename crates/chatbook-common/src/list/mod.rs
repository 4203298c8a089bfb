//! Virtualized, incrementally loading list core.
//!
//! None of the pieces depend on a UI toolkit:
//!
//! - [`ViewportTracker`] turns raw resize/scroll notifications into at most
//!   one [`Measurement`] per frame.
//! - [`WindowingEngine`] maps a measurement to the [`Range`] of rows worth
//!   rendering, plus the spacer sizes standing in for everything else.
//! - [`IncrementalLoader`] decides when to ask the item source for more
//!   rows, with single-flight and ceiling guards.
//! - [`ScrollPreserver`] keeps a reader pinned to the tail across loads.
//! - [`ListSurface`] wires them together for a host event loop.

mod loader;
mod preserve;
mod surface;
mod viewport;
mod window;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use loader::{
    FirstLoadGate, IncrementalLoader, LoadRequest, LoadTicket, LoaderPhase, SentinelObserver,
    Trigger, SENTINEL_HEIGHT,
};
pub use preserve::{ScrollPreserver, SmoothScroll, StickyScrollIntent};
pub use surface::{BatchSource, FrameOutcome, ItemSource, ListSurface};
pub use viewport::{LatestSlot, Measurement, ScrollGeometry, ViewportTracker};
pub use window::{compute_range, Range, RangeChange, Window, WindowingEngine, DEFAULT_RANGE_LEN};

/// Tuning knobs for the list core. Lengths are in host units (pixels for a
/// browser-like host, cell rows for a terminal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListConfig {
    /// Uniform height of every row
    pub row_height: f32,
    /// Extra rows rendered on each side of the viewport
    pub overscan: usize,
    /// Items requested per load
    pub batch_size: usize,
    /// Hard upper bound on items in the source; loading stops for good here
    pub ceiling: usize,
    /// Pause after appending a batch before scroll resolution
    pub settle_delay_ms: u64,
    /// Pause after a load before the sentinel is observed again
    pub rearm_delay_ms: u64,
    /// Tolerance for "the reader is at the bottom"
    pub bottom_threshold: f32,
    /// Tolerance for the first-load gate's near-bottom check
    pub gate_threshold: f32,
    /// Scroll offset past which the reader counts as having scrolled
    pub user_scroll_threshold: f32,
    /// Viewport height changes at or below this are ignored
    pub resize_hysteresis: f32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            row_height: 72.0,
            overscan: 6,
            batch_size: 12,
            ceiling: 4000,
            settle_delay_ms: 120,
            rearm_delay_ms: 140,
            bottom_threshold: 48.0,
            gate_threshold: 2.0,
            user_scroll_threshold: 4.0,
            resize_hysteresis: 2.0,
        }
    }
}

impl ListConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn rearm_delay(&self) -> Duration {
        Duration::from_millis(self.rearm_delay_ms)
    }

    /// Row height guarded against zero and negative values
    pub fn effective_row_height(&self) -> f32 {
        if self.row_height.is_finite() && self.row_height > 0.0 {
            self.row_height
        } else {
            1.0
        }
    }
}
