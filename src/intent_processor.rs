//! Intent processing module
//!
//! Everything that changes render state from outside the render thread
//! arrives here as an [`Intent`] and is applied at the start of a tick.

use tracing::{debug, trace};

use crate::channel::{Channel, Receiver, Sender};
use crate::color::Color;
use crate::protocol::KeyEvent;
use crate::state::BackdropState;

/// Default capacity of the intent queue.
pub const DEFAULT_INTENT_CHANNEL_SIZE: usize = 256;

/// A queued change to the render state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Key strike or release from the ingestor
    Key(KeyEvent),
    /// Set current and target color at once
    SetColor(Color),
    /// Set the color to blend toward
    SetTargetColor(Color),
    /// Set the intensity level of lit keys
    SetIntensity(u8),
}

/// Type alias for intent sender
pub type IntentSender<'a, const SIZE: usize> = Sender<'a, Intent, SIZE>;

/// Type alias for intent receiver
pub type IntentReceiver<'a, const SIZE: usize> = Receiver<'a, Intent, SIZE>;

/// Type alias for the intent channel
pub type IntentChannel<const SIZE: usize> = Channel<Intent, SIZE>;

/// Drains queued intents into the render state
pub struct IntentProcessor<'a, const SIZE: usize> {
    intents: IntentReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> IntentProcessor<'a, SIZE> {
    pub const fn new(intents: IntentReceiver<'a, SIZE>) -> Self {
        Self { intents }
    }

    /// Apply every pending intent in arrival order.
    ///
    /// Returns the number of intents applied.
    pub fn process_pending(&mut self, state: &mut BackdropState) -> usize {
        let dropped = self.intents.take_dropped();
        if dropped > 0 {
            debug!(dropped, "intent queue overflowed");
        }

        let mut pending = self.intents.take_pending();
        let mut applied = 0;
        while let Some(intent) = pending.pop_front() {
            apply(state, &intent);
            applied += 1;
        }
        applied
    }
}

fn apply(state: &mut BackdropState, intent: &Intent) {
    match intent {
        Intent::Key(event) => {
            trace!(
                note = event.note,
                velocity = event.velocity,
                hue = ?event.hue,
                "key event"
            );
            state.apply_key_event(event);
        }
        Intent::SetColor(color) => state.set_color(*color),
        Intent::SetTargetColor(color) => state.set_target_color(*color),
        Intent::SetIntensity(level) => state.set_intensity(*level),
    }
}
