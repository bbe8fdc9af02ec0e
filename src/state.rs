//! Render-thread state
//!
//! Key envelopes, the global color and the last release time. Only the
//! render thread owns this; other threads reach it through queued intents.

use embassy_time::{Duration, Instant};
use tracing::trace;

use crate::color::{Color, ColorBlender, hsv_to_rgb};
use crate::config::BackdropConfig;
use crate::envelope::KeyEnvelopeTable;
use crate::frame::MAX_INTENSITY;
use crate::protocol::KeyEvent;

#[derive(Debug, Clone)]
pub struct BackdropState {
    pub(crate) keys: KeyEnvelopeTable,
    pub(crate) color: ColorBlender,
    last_release: Instant,
    note_interval: Duration,
    intensity: u8,
}

impl BackdropState {
    pub fn new(config: &BackdropConfig) -> Self {
        Self {
            keys: KeyEnvelopeTable::new(&config.smoothing),
            color: ColorBlender::new(config.smoothing.alpha),
            last_release: Instant::from_ticks(0),
            note_interval: config.smoothing.note_interval,
            intensity: config.intensity & MAX_INTENSITY,
        }
    }

    /// Apply a key event.
    ///
    /// A hue always retargets the color. A note-on with a hue snaps the
    /// color when no key is held and the last release is older than the
    /// note interval.
    pub fn apply_key_event(&mut self, event: &KeyEvent) {
        if let Some(hue) = event.hue {
            self.color.set_target(hsv_to_rgb(hue, 1.0, 1.0));
        }

        if event.is_release() {
            self.last_release = event.at;
        } else if event.hue.is_some() && self.is_quiet(event.at) {
            trace!(note = event.note, "new phrase, snapping color");
            self.color.snap();
        }

        self.keys.strike(event.note, event.velocity);
    }

    fn is_quiet(&self, now: Instant) -> bool {
        let since_release = now
            .checked_duration_since(self.last_release)
            .unwrap_or(Duration::from_ticks(0));
        since_release > self.note_interval && self.keys.sum_raw() == 0.0
    }

    pub const fn keys(&self) -> &KeyEnvelopeTable {
        &self.keys
    }

    pub const fn current_color(&self) -> Color {
        self.color.current()
    }

    pub const fn target_color(&self) -> Color {
        self.color.target()
    }

    pub const fn last_release(&self) -> Instant {
        self.last_release
    }

    /// Intensity level written for lit keys.
    pub const fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: u8) {
        self.intensity = intensity & MAX_INTENSITY;
    }

    /// Set both current and target, so the color holds.
    pub fn set_color(&mut self, color: Color) {
        self.color.set_target(color);
        self.color.snap();
    }

    /// Set only the target; the current color blends toward it.
    pub fn set_target_color(&mut self, color: Color) {
        self.color.set_target(color);
    }
}

impl Default for BackdropState {
    fn default() -> Self {
        Self::new(&BackdropConfig::default())
    }
}
