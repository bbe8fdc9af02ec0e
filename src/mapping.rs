//! Linear mapping helpers
//!
//! Converts key indices to strip positions and strike velocities to
//! brightness. All functions are pure.

/// Lowest key that still moves along the strip.
pub const MIN_KEY: f32 = 28.0;
/// Highest key that still moves along the strip.
pub const MAX_KEY: f32 = 100.0;
/// LED lit by [`MIN_KEY`] (and every key below it).
pub const MIN_KEY_LED: f32 = 173.0;
/// LED lit by [`MAX_KEY`] (and every key above it).
pub const MAX_KEY_LED: f32 = 30.0;

/// Velocity at or below which a key is fully dark.
pub const MIN_VELOCITY: f32 = 20.0;
/// Velocity at or above which a key is fully bright.
pub const MAX_VELOCITY: f32 = 110.0;

/// Map `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The interpolation fraction is clamped to `0..=1`, so the result never
/// leaves the output range. `out_min` may be larger than `out_max`, which
/// produces a decreasing map.
#[inline]
pub fn lerp_clamped(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    let fraction = if span == 0.0 {
        if x <= in_min { 0.0 } else { 1.0 }
    } else {
        ((x - in_min) / span).clamp(0.0, 1.0)
    };
    out_min + fraction * (out_max - out_min)
}

/// LED position for a key, using the default [`KeyMap`].
///
/// Higher keys land on lower LED indices.
#[inline]
pub fn key_to_led(key: u8) -> isize {
    KeyMap::DEFAULT.led_for(key)
}

/// Brightness in `0..=1` for a (possibly decayed) velocity.
#[inline]
pub fn velocity_to_brightness(velocity: f32) -> f32 {
    lerp_clamped(velocity, MIN_VELOCITY, MAX_VELOCITY, 0.0, 1.0)
}

/// Placement of the keyboard along the strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyMap {
    pub min_key: f32,
    pub max_key: f32,
    pub min_led: f32,
    pub max_led: f32,
}

impl KeyMap {
    pub const DEFAULT: Self = Self {
        min_key: MIN_KEY,
        max_key: MAX_KEY,
        min_led: MIN_KEY_LED,
        max_led: MAX_KEY_LED,
    };

    /// First of the two LEDs lit by `key`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn led_for(&self, key: u8) -> isize {
        lerp_clamped(
            f32::from(key),
            self.min_key,
            self.max_key,
            self.min_led,
            self.max_led,
        )
        .floor() as isize
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}
