//! Global color smoothing
//!
//! The displayed color drifts toward the most recently requested hue a
//! few percent per tick, unless a new phrase starts after silence, in
//! which case it jumps there directly.

use super::{BLACK, Color};

/// Share of the current color kept on every tick.
pub const ALPHA: f32 = 0.97;

/// Exponential blend from the current color toward a target
#[derive(Debug, Clone, Copy)]
pub struct ColorBlender {
    alpha: f32,
    current: Color,
    target: Color,
}

impl ColorBlender {
    pub const fn new(alpha: f32) -> Self {
        Self {
            alpha,
            current: BLACK,
            target: BLACK,
        }
    }

    pub const fn current(&self) -> Color {
        self.current
    }

    pub const fn target(&self) -> Color {
        self.target
    }

    /// Set the color to blend toward.
    pub fn set_target(&mut self, target: Color) {
        self.target = target;
    }

    /// Jump straight to the target, skipping the blend.
    pub fn snap(&mut self) {
        self.current = self.target;
    }

    /// Replace the current color without touching the target.
    pub fn set_current(&mut self, current: Color) {
        self.current = current;
    }

    /// Advance the blend by one tick.
    pub fn tick(&mut self) {
        let keep = self.alpha;
        let take = 1.0 - keep;
        self.current = Color::new(
            keep * self.current.r + take * self.target.r,
            keep * self.current.g + take * self.target.g,
            keep * self.current.b + take * self.target.b,
        );
    }
}

impl Default for ColorBlender {
    fn default() -> Self {
        Self::new(ALPHA)
    }
}
