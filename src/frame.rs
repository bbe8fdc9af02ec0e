//! Wire frame for APA102-style strips
//!
//! Layout: four zero bytes (start marker), then one 4-byte slot per LED
//! `[0xE0 | intensity, blue, green, red]`, then `ceil(N / 16) + 1` zero bytes so
//! the clock keeps running long enough for the last LEDs to latch.

use tracing::warn;

use crate::color::{Color, Rgb, channel_byte};

const HEADER_LEN: usize = 4;
const SLOT_LEN: usize = 4;
const BRIGHTNESS_MARKER: u8 = 0xE0;

/// Highest per-LED intensity level.
pub const MAX_INTENSITY: u8 = 0x1F;

/// Total encoded length of a frame for `num_leds` LEDs.
pub const fn encoded_len(num_leds: usize) -> usize {
    HEADER_LEN + SLOT_LEN * num_leds + trailer_len(num_leds)
}

const fn trailer_len(num_leds: usize) -> usize {
    num_leds.div_ceil(16) + 1
}

/// Brightness byte for an intensity level. Only the low 5 bits are used.
#[inline]
pub const fn brightness_byte(intensity: u8) -> u8 {
    BRIGHTNESS_MARKER | (intensity & MAX_INTENSITY)
}

/// One encoded frame, ready to be clocked out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    num_leds: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Create a frame with every LED off.
    pub fn new(num_leds: usize) -> Self {
        let mut frame = Self {
            num_leds,
            data: vec![0; encoded_len(num_leds)],
        };
        frame.clear_all();
        frame
    }

    pub const fn num_leds(&self) -> usize {
        self.num_leds
    }

    /// The complete wire buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Wrap an arbitrary index onto the strip.
    ///
    /// Returns `None` only for an empty strip.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn wrap_index(&self, index: isize) -> Option<usize> {
        if self.num_leds == 0 {
            return None;
        }
        Some(index.rem_euclid(self.num_leds as isize) as usize)
    }

    /// Set one LED. Out-of-range indices wrap around the strip.
    #[allow(clippy::cast_possible_wrap)]
    pub fn set_led(&mut self, index: isize, color: Color, intensity: u8) {
        let Some(wrapped) = self.wrap_index(index) else {
            warn!(index, "Attempted to set an LED on an empty strip");
            return;
        };
        if index < 0 {
            warn!(index, wrapped, "Negative LED index, wrapping");
        } else if wrapped as isize != index {
            warn!(index, wrapped, "LED index beyond end of strip, wrapping");
        }
        let slot = encode_slot(color, intensity);
        self.write_slot(wrapped, slot);
    }

    /// Set every LED to the same color.
    pub fn set_all(&mut self, color: Color, intensity: u8) {
        let slot = encode_slot(color, intensity);
        for chunk in self.slots_mut().chunks_exact_mut(SLOT_LEN) {
            chunk.copy_from_slice(&slot);
        }
    }

    /// Turn every LED off (black, intensity 0).
    pub fn clear_all(&mut self) {
        self.set_all(crate::color::BLACK, 0);
    }

    /// Decode one slot back into its intensity level and color.
    pub fn led(&self, index: usize) -> Option<(u8, Rgb)> {
        if index >= self.num_leds {
            return None;
        }
        let offset = slot_offset(index);
        let slot = &self.data[offset..offset + SLOT_LEN];
        Some((
            slot[0] & MAX_INTENSITY,
            Rgb::new(slot[3], slot[2], slot[1]),
        ))
    }

    fn write_slot(&mut self, index: usize, slot: [u8; SLOT_LEN]) {
        let offset = slot_offset(index);
        self.data[offset..offset + SLOT_LEN].copy_from_slice(&slot);
    }

    fn slots_mut(&mut self) -> &mut [u8] {
        let end = slot_offset(self.num_leds);
        &mut self.data[HEADER_LEN..end]
    }
}

#[inline]
const fn slot_offset(index: usize) -> usize {
    HEADER_LEN + SLOT_LEN * index
}

/// Slot bytes in wire order: brightness, blue, green, red.
#[inline]
fn encode_slot(color: Color, intensity: u8) -> [u8; SLOT_LEN] {
    [
        brightness_byte(intensity),
        channel_byte(color.b),
        channel_byte(color.g),
        channel_byte(color.r),
    ]
}
