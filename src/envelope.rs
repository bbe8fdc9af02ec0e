//! Per-key brightness envelopes
//!
//! Every key keeps two values. `raw` is set to the strike velocity and
//! decays geometrically every tick. `fast` follows `raw` with a quick
//! attack and a slow release and is what ends up on the strip.

use crate::config::Smoothing;

/// Number of addressable keys (MIDI note range).
pub const NUM_KEYS: usize = 128;

/// Per-tick decay of `raw`.
pub const BETA: f32 = 0.996;
/// Follower coefficient while `fast` is rising.
pub const GAMMA_INC: f32 = 0.8;
/// Follower coefficient while `fast` is falling.
pub const GAMMA_DEC: f32 = 0.92;

/// Envelope state of a single key
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyEnvelope {
    pub raw: f32,
    pub fast: f32,
}

impl KeyEnvelope {
    /// Advance one tick.
    #[inline]
    fn tick(&mut self, beta: f32, gamma_inc: f32, gamma_dec: f32) {
        self.raw = flush_denormal(self.raw * beta);
        let gamma = if self.fast >= self.raw {
            gamma_dec
        } else {
            gamma_inc
        };
        self.fast = flush_denormal(gamma * self.fast + (1.0 - gamma) * self.raw);
    }
}

/// Subnormal values never decay to zero under repeated scaling by `BETA`,
/// so a silent key would count as held forever.
#[inline]
fn flush_denormal(value: f32) -> f32 {
    if value < f32::MIN_POSITIVE { 0.0 } else { value }
}

/// Envelopes for all keys
#[derive(Debug, Clone)]
pub struct KeyEnvelopeTable {
    keys: [KeyEnvelope; NUM_KEYS],
    beta: f32,
    gamma_inc: f32,
    gamma_dec: f32,
}

impl KeyEnvelopeTable {
    pub fn new(smoothing: &Smoothing) -> Self {
        Self {
            keys: [KeyEnvelope::default(); NUM_KEYS],
            beta: smoothing.beta,
            gamma_inc: smoothing.gamma_inc,
            gamma_dec: smoothing.gamma_dec,
        }
    }

    /// Register a strike. Zero velocity leaves the envelope alone.
    ///
    /// Returns `false` if `key` is outside the table.
    pub fn strike(&mut self, key: u8, velocity: u8) -> bool {
        let Some(envelope) = self.keys.get_mut(usize::from(key)) else {
            return false;
        };
        if velocity > 0 {
            envelope.raw = f32::from(velocity);
        }
        true
    }

    /// Advance every key by one tick.
    pub fn tick(&mut self) {
        let (beta, inc, dec) = (self.beta, self.gamma_inc, self.gamma_dec);
        for key in &mut self.keys {
            key.tick(beta, inc, dec);
        }
    }

    /// Sum of all raw values. Zero means no key is considered held.
    pub fn sum_raw(&self) -> f32 {
        self.keys.iter().map(|key| key.raw).sum()
    }

    pub fn get(&self, key: u8) -> Option<&KeyEnvelope> {
        self.keys.get(usize::from(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyEnvelope> {
        self.keys.iter()
    }
}

impl Default for KeyEnvelopeTable {
    fn default() -> Self {
        Self::new(&Smoothing::default())
    }
}
