use super::viewport::ScrollGeometry;

/// Whether the reader was pinned to the tail when a load began.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickyScrollIntent {
    pub was_at_bottom: bool,
}

impl StickyScrollIntent {
    pub fn new(was_at_bottom: bool) -> Self {
        Self { was_at_bottom }
    }

    /// The reader moved on their own; leave the viewport alone.
    pub fn cancel(&mut self) {
        self.was_at_bottom = false;
    }
}

/// Captures the sticky intent before a load and resolves it afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPreserver {
    bottom_threshold: f32,
}

impl ScrollPreserver {
    pub fn new(bottom_threshold: f32) -> Self {
        Self { bottom_threshold }
    }

    pub fn capture(&self, geometry: &ScrollGeometry) -> StickyScrollIntent {
        StickyScrollIntent::new(geometry.is_within_bottom(self.bottom_threshold))
    }

    /// Target offset once new rows are laid out, or `None` to stay put.
    pub fn resolve(&self, intent: StickyScrollIntent, geometry: &ScrollGeometry) -> Option<f32> {
        intent.was_at_bottom.then(|| geometry.max_offset())
    }
}

/// Exponential ease-out toward a target offset, advanced once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    position: f32,
    target: f32,
    /// Fraction of the remaining distance covered each step
    speed: f32,
}

/// Distance below which the animation snaps to its target
const SNAP_DISTANCE: f32 = 0.4;

impl SmoothScroll {
    pub const DEFAULT_SPEED: f32 = 0.35;

    pub fn new(from: f32, target: f32) -> Self {
        Self::with_speed(from, target, Self::DEFAULT_SPEED)
    }

    pub fn with_speed(from: f32, target: f32, speed: f32) -> Self {
        Self {
            position: from,
            target,
            speed: speed.clamp(0.01, 1.0),
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.position == self.target
    }

    /// Advance one step and return the new position
    pub fn tick(&mut self) -> f32 {
        let remaining = self.target - self.position;
        if remaining.abs() < SNAP_DISTANCE {
            self.position = self.target;
        } else {
            self.position += remaining * self.speed;
        }
        self.position
    }
}
