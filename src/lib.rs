pub mod channel;
pub mod color;
pub mod config;
pub mod control;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod frame_scheduler;
pub mod ingest;
pub mod intent_processor;
pub mod mapping;
pub mod pattern;
pub mod protocol;
pub mod renderer;
pub mod state;

pub use config::{BackdropConfig, RetryPolicy, SchedulerConfig, Smoothing};
pub use control::{ColorControl, ColorSnapshot, SharedColor};
pub use error::{ProtocolError, SchedulerError, TransportError};
pub use frame::Frame;
pub use frame_scheduler::{FrameScheduler, TickResult};
pub use ingest::UdpIngestor;
pub use intent_processor::{
    DEFAULT_INTENT_CHANNEL_SIZE, Intent, IntentChannel, IntentProcessor, IntentReceiver,
    IntentSender,
};
pub use mapping::{KeyMap, key_to_led, lerp_clamped, velocity_to_brightness};
pub use pattern::RainbowPattern;
pub use protocol::{KeyEvent, parse_datagram};
pub use renderer::Renderer;
pub use state::BackdropState;

pub use color::{Color, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED bus trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait BusTransport {
    /// Write one encoded frame to the bus
    fn write(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Release the bus. Called once, after the final all-off frame.
    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Anything that produces one frame per tick
pub trait FrameSource {
    /// Number of LEDs in produced frames
    fn num_leds(&self) -> usize;

    /// Render the frame for process time `now`
    fn render(&mut self, now: Instant) -> &Frame;
}

/// Transport that discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl BusTransport for NullTransport {
    fn write(&mut self, _frame: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
}
