//! Color access for outside callers
//!
//! The renderer publishes a [`ColorSnapshot`] after every tick. Readers get
//! a consistent copy; writers queue an intent that the renderer applies on
//! its next tick.

use core::cell::Cell;

use critical_section::Mutex;

use crate::channel::TrySendError;
use crate::color::{BLACK, Color};
use crate::frame::MAX_INTENSITY;
use crate::intent_processor::{Intent, IntentSender};

/// Published color state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSnapshot {
    pub current: Color,
    pub target: Color,
    pub intensity: u8,
}

impl Default for ColorSnapshot {
    fn default() -> Self {
        Self {
            current: BLACK,
            target: BLACK,
            intensity: MAX_INTENSITY,
        }
    }
}

/// Last color state published by the renderer
pub struct SharedColor {
    inner: Mutex<Cell<ColorSnapshot>>,
}

impl SharedColor {
    pub const fn new(initial: ColorSnapshot) -> Self {
        Self {
            inner: Mutex::new(Cell::new(initial)),
        }
    }

    pub fn load(&self) -> ColorSnapshot {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    pub(crate) fn store(&self, snapshot: ColorSnapshot) {
        critical_section::with(|cs| self.inner.borrow(cs).set(snapshot));
    }
}

impl Default for SharedColor {
    fn default() -> Self {
        Self::new(ColorSnapshot::default())
    }
}

/// Handle for external color control
#[derive(Clone, Copy)]
pub struct ColorControl<'a, const SIZE: usize> {
    shared: &'a SharedColor,
    intents: IntentSender<'a, SIZE>,
}

impl<'a, const SIZE: usize> ColorControl<'a, SIZE> {
    pub const fn new(shared: &'a SharedColor, intents: IntentSender<'a, SIZE>) -> Self {
        Self { shared, intents }
    }

    pub fn snapshot(&self) -> ColorSnapshot {
        self.shared.load()
    }

    pub fn current(&self) -> Color {
        self.snapshot().current
    }

    pub fn target(&self) -> Color {
        self.snapshot().target
    }

    pub fn intensity(&self) -> u8 {
        self.snapshot().intensity
    }

    /// Show `color` from the next tick on, without blending.
    pub fn set_color(&self, color: Color) -> Result<(), TrySendError<Intent>> {
        self.intents.try_send(Intent::SetColor(clamp_color(color)))
    }

    /// Blend toward `color`.
    pub fn set_target(&self, color: Color) -> Result<(), TrySendError<Intent>> {
        self.intents.try_send(Intent::SetTargetColor(clamp_color(color)))
    }

    /// Set the intensity level (0-31) of lit keys.
    pub fn set_intensity(&self, level: u8) -> Result<(), TrySendError<Intent>> {
        self.intents
            .try_send(Intent::SetIntensity(level.min(MAX_INTENSITY)))
    }
}

fn clamp_color(color: Color) -> Color {
    Color::new(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
    )
}
