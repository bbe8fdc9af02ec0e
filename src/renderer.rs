use embassy_time::Instant;

use crate::FrameSource;
use crate::color::{BLACK, scale};
use crate::config::BackdropConfig;
use crate::control::{ColorSnapshot, SharedColor};
use crate::frame::Frame;
use crate::intent_processor::{IntentProcessor, IntentReceiver};
use crate::mapping::{KeyMap, velocity_to_brightness};
use crate::state::BackdropState;

/// Keyboard backdrop renderer
///
/// Turns the key envelopes and the blended color into one frame per tick.
pub struct Renderer<'a, const INTENT_CHANNEL_SIZE: usize> {
    // External dependencies and configuration
    intent_processor: IntentProcessor<'a, INTENT_CHANNEL_SIZE>,
    shared_color: Option<&'a SharedColor>,
    key_map: KeyMap,

    // Internal state
    state: BackdropState,
    frame: Frame,
}

impl<'a, const INTENT_CHANNEL_SIZE: usize> Renderer<'a, INTENT_CHANNEL_SIZE> {
    pub fn new(intents: IntentReceiver<'a, INTENT_CHANNEL_SIZE>, config: &BackdropConfig) -> Self {
        Self {
            intent_processor: IntentProcessor::new(intents),
            shared_color: None,
            key_map: config.key_map,
            state: BackdropState::new(config),
            frame: Frame::new(config.num_leds),
        }
    }

    /// Publish the color state to `shared` after every tick.
    #[must_use]
    pub fn with_shared_color(mut self, shared: &'a SharedColor) -> Self {
        shared.store(self.snapshot());
        self.shared_color = Some(shared);
        self
    }

    /// Process one frame
    ///
    /// Queued intents are applied first, then the color and every key
    /// envelope advance exactly one step.
    pub fn render(&mut self, _now: Instant) -> &Frame {
        self.intent_processor.process_pending(&mut self.state);

        self.state.color.tick();
        self.state.keys.tick();

        let base = self.state.current_color();
        let intensity = self.state.intensity();
        for (key, envelope) in (0..=u8::MAX).zip(self.state.keys.iter()) {
            let led = self.key_map.led_for(key);
            if envelope.fast > 0.0 {
                let color = scale(base, velocity_to_brightness(envelope.fast));
                self.frame.set_led(led, color, intensity);
                self.frame.set_led(led + 1, color, intensity);
            } else {
                self.frame.set_led(led, BLACK, 0);
                self.frame.set_led(led + 1, BLACK, 0);
            }
        }

        if let Some(shared) = self.shared_color {
            shared.store(self.snapshot());
        }

        &self.frame
    }

    pub const fn state(&self) -> &BackdropState {
        &self.state
    }

    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    fn snapshot(&self) -> ColorSnapshot {
        ColorSnapshot {
            current: self.state.current_color(),
            target: self.state.target_color(),
            intensity: self.state.intensity(),
        }
    }
}

impl<const INTENT_CHANNEL_SIZE: usize> FrameSource for Renderer<'_, INTENT_CHANNEL_SIZE> {
    fn num_leds(&self) -> usize {
        self.frame.num_leds()
    }

    fn render(&mut self, now: Instant) -> &Frame {
        Renderer::render(self, now)
    }
}
