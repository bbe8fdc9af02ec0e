//! Runtime configuration
//!
//! Every struct has a `Default` matching the stock strip and keyboard
//! layout, so callers only override what differs.

use embassy_time::Duration;

use crate::color::ALPHA;
use crate::envelope::{BETA, GAMMA_DEC, GAMMA_INC};
use crate::mapping::KeyMap;

/// LEDs on the stock strip.
pub const DEFAULT_NUM_LEDS: usize = 288;

/// Silence after a release beyond which a new note snaps the color.
pub const NOTE_INTERVAL: Duration = Duration::from_millis(100);

/// Delay between render ticks. The loop is otherwise uncapped.
pub const DEFAULT_PACE: Duration = Duration::from_millis(1);

/// Smoothing coefficients for envelopes and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    /// Share of the current color kept per tick
    pub alpha: f32,
    /// Per-tick decay of raw key values
    pub beta: f32,
    /// Follower coefficient while rising
    pub gamma_inc: f32,
    /// Follower coefficient while falling
    pub gamma_dec: f32,
    /// Quiet time after a release that allows an instant color change
    pub note_interval: Duration,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            alpha: ALPHA,
            beta: BETA,
            gamma_inc: GAMMA_INC,
            gamma_dec: GAMMA_DEC,
            note_interval: NOTE_INTERVAL,
        }
    }
}

/// How hard to try before a bus write is considered failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per frame, including the first one
    pub max_attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(2),
        }
    }
}

/// Configuration for the backdrop renderer
#[derive(Debug, Clone)]
pub struct BackdropConfig {
    pub num_leds: usize,
    pub key_map: KeyMap,
    pub smoothing: Smoothing,
    /// Intensity level written for lit keys (0-31)
    pub intensity: u8,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            num_leds: DEFAULT_NUM_LEDS,
            key_map: KeyMap::DEFAULT,
            smoothing: Smoothing::default(),
            intensity: crate::frame::MAX_INTENSITY,
        }
    }
}

/// Configuration for the render loop driver
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub pace: Duration,
    pub retry: RetryPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pace: DEFAULT_PACE,
            retry: RetryPolicy::default(),
        }
    }
}
