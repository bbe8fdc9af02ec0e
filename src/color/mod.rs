mod blender;
mod hsv;

pub use blender::{ALPHA, ColorBlender};
pub use hsv::hsv_to_rgb;
use smart_leds::{RGB, RGB8};

/// Floating point color, every channel in `0..=1`
pub type Color = RGB<f32>;

/// Color as it appears on the wire
pub type Rgb = RGB8;

pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
};

/// Multiply every channel of `color` by `factor`.
#[inline]
pub fn scale(color: Color, factor: f32) -> Color {
    Color::new(color.r * factor, color.g * factor, color.b * factor)
}

/// Quantize one channel to a wire byte: `round(channel * 255) & 0xFF`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn channel_byte(channel: f32) -> u8 {
    ((channel * 255.0).round() as i64 & 0xFF) as u8
}

/// Quantize a whole color to wire bytes.
#[inline]
pub fn to_rgb8(color: Color) -> Rgb {
    Rgb::new(
        channel_byte(color.r),
        channel_byte(color.g),
        channel_byte(color.b),
    )
}
