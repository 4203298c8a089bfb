/// Rows rendered before the viewport has been measured
pub const DEFAULT_RANGE_LEN: usize = 10;

/// Half-open slice `[start, end)` of rows to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub const EMPTY: Range = Range { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// The same range with `end` clamped to `len`
    pub fn clamp_to(&self, len: usize) -> Range {
        Range::new(self.start.min(len), self.end.min(len))
    }
}

/// A range plus the space reserved for the rows outside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub range: Range,
    pub top_spacer: f32,
    pub bottom_spacer: f32,
}

impl Window {
    pub const EMPTY: Window = Window {
        range: Range::EMPTY,
        top_spacer: 0.0,
        bottom_spacer: 0.0,
    };

    /// Spacer sizes for `range` within a list of `total_count` rows
    pub fn for_range(range: Range, row_height: f32, total_count: usize) -> Self {
        if total_count == 0 {
            return Window::EMPTY;
        }
        let range = range.clamp_to(total_count);
        let top_spacer = range.start as f32 * row_height;
        let rendered = range.len() as f32 * row_height;
        let total_height = total_count as f32 * row_height;
        Window {
            range,
            top_spacer,
            bottom_spacer: (total_height - top_spacer - rendered).max(0.0),
        }
    }

    /// Height covered by spacers and rendered rows together
    pub fn span(&self, row_height: f32) -> f32 {
        self.top_spacer + self.range.len() as f32 * row_height + self.bottom_spacer
    }
}

/// Rows intersecting `[scroll_offset, scroll_offset + viewport_height)`,
/// widened by `overscan` rows on each side and clamped to `[0, total_count]`.
pub fn compute_range(
    scroll_offset: f32,
    viewport_height: f32,
    row_height: f32,
    total_count: usize,
    overscan: usize,
) -> Range {
    if total_count == 0 {
        return Range::EMPTY;
    }
    if !(viewport_height.is_finite() && viewport_height > 0.0) {
        return Range::new(0, DEFAULT_RANGE_LEN.min(total_count));
    }

    let row_height = if row_height.is_finite() && row_height > 0.0 {
        row_height
    } else {
        1.0
    };
    let scroll_offset = if scroll_offset.is_finite() {
        scroll_offset.max(0.0)
    } else {
        0.0
    };

    let first_visible = (scroll_offset / row_height).floor() as usize;
    let last_visible = ((scroll_offset + viewport_height) / row_height).ceil() as usize;

    let end = last_visible.saturating_add(overscan).min(total_count);
    let start = first_visible.saturating_sub(overscan).min(end);
    Range { start, end }
}

/// Outcome of a recomputation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeChange {
    /// Start and end match the previous range; downstream work can be skipped
    Unchanged,
    Changed { previous: Range, current: Range },
}

impl RangeChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, RangeChange::Changed { .. })
    }
}

/// Stateful wrapper around [`compute_range`] that remembers the last range
/// so callers can tell when nothing moved.
#[derive(Debug, Clone)]
pub struct WindowingEngine {
    row_height: f32,
    overscan: usize,
    range: Range,
    total_count: usize,
}

impl WindowingEngine {
    pub fn new(row_height: f32, overscan: usize) -> Self {
        Self {
            row_height,
            overscan,
            range: Range::EMPTY,
            total_count: 0,
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn window(&self) -> Window {
        Window::for_range(self.range, self.row_height, self.total_count)
    }

    pub fn recompute(
        &mut self,
        scroll_offset: f32,
        viewport_height: f32,
        total_count: usize,
    ) -> RangeChange {
        self.total_count = total_count;
        let next = compute_range(
            scroll_offset,
            viewport_height,
            self.row_height,
            total_count,
            self.overscan,
        );
        if next == self.range {
            return RangeChange::Unchanged;
        }
        let previous = std::mem::replace(&mut self.range, next);
        tracing::trace!(
            start = next.start,
            end = next.end,
            total = total_count,
            "visible range changed"
        );
        RangeChange::Changed {
            previous,
            current: next,
        }
    }

    /// Forget the cached range, e.g. when the item source is swapped out
    pub fn reset(&mut self) {
        self.range = Range::EMPTY;
        self.total_count = 0;
    }
}
