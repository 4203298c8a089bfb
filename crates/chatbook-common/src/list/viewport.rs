use super::loader::SENTINEL_HEIGHT;

/// Single-slot mailbox that keeps only the most recent value.
///
/// High-frequency producers `put` into it; the frame callback `take`s the
/// latest value once per frame. Intermediate values are dropped.
#[derive(Debug, Clone, Default)]
pub struct LatestSlot<T> {
    value: Option<T>,
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Store `value`, returning `true` if it replaced one not yet taken
    pub fn put(&mut self, value: T) -> bool {
        self.value.replace(value).is_some()
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn is_pending(&self) -> bool {
        self.value.is_some()
    }
}

/// Normalized viewport reading delivered to the windowing engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    pub viewport_height: f32,
    pub scroll_offset: f32,
}

/// Collects resize and scroll notifications and flushes them once per frame.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    hysteresis: f32,
    /// Last height that passed the hysteresis filter
    reported_height: Option<f32>,
    current: Measurement,
    pending_height: LatestSlot<f32>,
    pending_offset: LatestSlot<f32>,
}

fn normalize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl ViewportTracker {
    pub fn new(hysteresis: f32) -> Self {
        Self {
            hysteresis: normalize(hysteresis),
            reported_height: None,
            current: Measurement::default(),
            pending_height: LatestSlot::new(),
            pending_offset: LatestSlot::new(),
        }
    }

    /// Record a container size change. Changes within the hysteresis band
    /// of the last reported height are dropped.
    pub fn observe_size(&mut self, height: f32) {
        let height = normalize(height);
        if let Some(reported) = self.reported_height {
            if (height - reported).abs() <= self.hysteresis {
                return;
            }
        }
        self.reported_height = Some(height);
        self.pending_height.put(height);
    }

    /// Record a scroll offset. Several calls within one frame collapse to
    /// the last one.
    pub fn observe_scroll(&mut self, offset: f32) {
        if self.pending_offset.put(normalize(offset)) {
            tracing::trace!(offset, "coalesced scroll report");
        }
    }

    /// Flush pending reports. Returns the new measurement if anything
    /// changed since the previous flush.
    pub fn on_frame(&mut self) -> Option<Measurement> {
        let height = self.pending_height.take();
        let offset = self.pending_offset.take();
        if height.is_none() && offset.is_none() {
            return None;
        }
        let next = Measurement {
            viewport_height: height.unwrap_or(self.current.viewport_height),
            scroll_offset: offset.unwrap_or(self.current.scroll_offset),
        };
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }

    /// Last flushed measurement
    pub fn measurement(&self) -> Measurement {
        self.current
    }

    /// Latest height that passed the filter, flushed or not
    pub fn latest_height(&self) -> f32 {
        self.reported_height.unwrap_or(0.0)
    }

    pub fn has_pending(&self) -> bool {
        self.pending_height.is_pending() || self.pending_offset.is_pending()
    }
}

/// Scroll container geometry at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollGeometry {
    pub scroll_offset: f32,
    pub viewport_height: f32,
    /// Total scrollable content height
    pub scroll_height: f32,
}

impl ScrollGeometry {
    pub fn max_offset(&self) -> f32 {
        (self.scroll_height - self.viewport_height).max(0.0)
    }

    pub fn is_within_bottom(&self, tolerance: f32) -> bool {
        self.scroll_offset + self.viewport_height >= self.scroll_height - tolerance
    }

    /// Whether the sentinel at the very end of the content intersects the
    /// viewport. An unmeasured viewport sees nothing.
    pub fn sentinel_visible(&self) -> bool {
        if self.viewport_height <= 0.0 {
            return false;
        }
        let sentinel_top = (self.scroll_height - SENTINEL_HEIGHT).max(0.0);
        sentinel_top < self.scroll_offset + self.viewport_height
            && sentinel_top + SENTINEL_HEIGHT > self.scroll_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_slot_keeps_last_value() {
        let mut slot = LatestSlot::new();
        assert!(!slot.put(1));
        assert!(slot.put(2));
        assert!(slot.put(3));
        assert_eq!(slot.take(), Some(3));
        assert_eq!(slot.take(), None);
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_scroll_reports_coalesce_per_frame() {
        let mut tracker = ViewportTracker::new(2.0);
        tracker.observe_size(400.0);
        for offset in [10.0, 50.0, 90.0, 130.0] {
            tracker.observe_scroll(offset);
        }
        let m = tracker.on_frame().unwrap();
        assert_eq!(m.scroll_offset, 130.0);
        assert_eq!(m.viewport_height, 400.0);
        assert_eq!(tracker.on_frame(), None);
    }

    #[test]
    fn test_resize_hysteresis() {
        let mut tracker = ViewportTracker::new(2.0);
        tracker.observe_size(400.0);
        tracker.on_frame();

        tracker.observe_size(401.5);
        assert!(!tracker.has_pending());
        tracker.observe_size(398.0);
        assert!(!tracker.has_pending());

        tracker.observe_size(402.5);
        assert_eq!(tracker.on_frame().unwrap().viewport_height, 402.5);
    }

    #[test]
    fn test_unmeasured_until_first_size() {
        let mut tracker = ViewportTracker::new(2.0);
        assert!(!tracker.has_pending());
        assert_eq!(tracker.measurement().viewport_height, 0.0);

        tracker.observe_size(f32::NAN);
        assert!(tracker.has_pending());
        assert_eq!(tracker.latest_height(), 0.0);

        tracker.observe_size(-5.0);
        assert_eq!(tracker.latest_height(), 0.0);
    }

    #[test]
    fn test_unchanged_flush_reports_nothing() {
        let mut tracker = ViewportTracker::new(0.0);
        tracker.observe_size(10.0);
        tracker.observe_scroll(3.0);
        assert!(tracker.on_frame().is_some());
        tracker.observe_scroll(3.0);
        assert_eq!(tracker.on_frame(), None);
    }

    #[test]
    fn test_geometry_bottom_and_sentinel() {
        let geometry = ScrollGeometry {
            scroll_offset: 0.0,
            viewport_height: 400.0,
            scroll_height: 7201.0,
        };
        assert!(!geometry.sentinel_visible());
        assert!(!geometry.is_within_bottom(48.0));
        assert_eq!(geometry.max_offset(), 6801.0);

        let at_end = ScrollGeometry {
            scroll_offset: 6801.0,
            ..geometry
        };
        assert!(at_end.sentinel_visible());
        assert!(at_end.is_within_bottom(0.0));

        let short = ScrollGeometry {
            scroll_offset: 0.0,
            viewport_height: 400.0,
            scroll_height: 145.0,
        };
        assert!(short.sentinel_visible());
        assert_eq!(short.max_offset(), 0.0);
    }

    #[test]
    fn test_sentinel_hidden_when_unmeasured() {
        let geometry = ScrollGeometry {
            scroll_offset: 0.0,
            viewport_height: 0.0,
            scroll_height: 1.0,
        };
        assert!(!geometry.sentinel_visible());
    }
}
