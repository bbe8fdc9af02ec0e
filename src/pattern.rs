//! Rainbow test pattern
//!
//! Sweeps the full hue circle twice along the strip and scrolls it with
//! time. Useful to check wiring and LED count without a keyboard.

use embassy_time::Instant;

use crate::FrameSource;
use crate::color::hsv_to_rgb;
use crate::frame::{Frame, MAX_INTENSITY};

/// Seconds for the rainbow to scroll one full hue cycle.
const CYCLE_SECONDS: f32 = 5.0;

pub struct RainbowPattern {
    frame: Frame,
}

impl RainbowPattern {
    pub fn new(num_leds: usize) -> Self {
        Self {
            frame: Frame::new(num_leds),
        }
    }
}

impl FrameSource for RainbowPattern {
    fn num_leds(&self) -> usize {
        self.frame.num_leds()
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    fn render(&mut self, now: Instant) -> &Frame {
        let t = now.as_micros() as f32 / 1_000_000.0;
        let count = self.frame.num_leds();
        for led in 0..count {
            let hue = (t / CYCLE_SECONDS - 2.0 * led as f32 / count as f32).rem_euclid(1.0);
            self.frame
                .set_led(led as isize, hsv_to_rgb(hue, 1.0, 1.0), MAX_INTENSITY);
        }
        &self.frame
    }
}
