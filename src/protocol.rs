//! Key event datagrams
//!
//! ASCII, comma separated: `note,velocity` or `note,velocity,hue`.
//! Whitespace around fields is ignored.

use embassy_time::Instant;

use crate::envelope::NUM_KEYS;
use crate::error::ProtocolError;

/// A parsed key event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub note: u8,
    /// Strike velocity; zero is a release
    pub velocity: u8,
    /// Hue in `0..1`, already wrapped
    pub hue: Option<f32>,
    /// Arrival time
    pub at: Instant,
}

impl KeyEvent {
    pub const fn is_release(&self) -> bool {
        self.velocity == 0
    }
}

/// Parse one datagram received at `at`.
pub fn parse_datagram(data: &[u8], at: Instant) -> Result<KeyEvent, ProtocolError> {
    let text = core::str::from_utf8(data).map_err(|_| ProtocolError::NotUtf8)?;
    let mut fields = text.split(',').map(str::trim);
    let (Some(note), Some(velocity)) = (fields.next(), fields.next()) else {
        return Err(ProtocolError::FieldCount(1));
    };
    let hue = fields.next();
    if fields.next().is_some() {
        return Err(ProtocolError::FieldCount(text.split(',').count()));
    }

    Ok(KeyEvent {
        note: parse_note(note)?,
        velocity: velocity
            .parse()
            .map_err(|_| invalid("velocity", velocity))?,
        hue: hue.map(parse_hue).transpose()?,
        at,
    })
}

fn parse_note(value: &str) -> Result<u8, ProtocolError> {
    let note: i64 = value.parse().map_err(|_| invalid("note", value))?;
    match u8::try_from(note) {
        Ok(note) if usize::from(note) < NUM_KEYS => Ok(note),
        _ => Err(ProtocolError::NoteOutOfRange(note)),
    }
}

fn parse_hue(value: &str) -> Result<f32, ProtocolError> {
    let hue: f32 = value.parse().map_err(|_| invalid("hue", value))?;
    if !hue.is_finite() {
        return Err(ProtocolError::NonFiniteHue);
    }
    Ok(hue.rem_euclid(1.0))
}

fn invalid(field: &'static str, value: &str) -> ProtocolError {
    ProtocolError::InvalidField {
        field,
        value: value.into(),
    }
}
