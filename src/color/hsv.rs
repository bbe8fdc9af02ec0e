use super::Color;

/// Convert HSV (all components in `0..=1`) to a floating point color.
///
/// The hue circle is split into six sectors; a hue of exactly `1.0`
/// wraps back to red.
#[allow(clippy::cast_possible_truncation, clippy::many_single_char_names)]
pub fn hsv_to_rgb(hue: f32, sat: f32, val: f32) -> Color {
    if sat == 0.0 {
        return Color::new(val, val, val);
    }
    let sector = (hue * 6.0).floor();
    let f = hue * 6.0 - sector;
    let p = val * (1.0 - sat);
    let q = val * (1.0 - sat * f);
    let t = val * (1.0 - sat * (1.0 - f));
    match (sector as i32).rem_euclid(6) {
        0 => Color::new(val, t, p),
        1 => Color::new(q, val, p),
        2 => Color::new(p, val, t),
        3 => Color::new(p, q, val),
        4 => Color::new(t, p, val),
        _ => Color::new(val, p, q),
    }
}
