//! Render loop driver
//!
//! Renders one frame per tick and pushes it to the bus. Writes that fail
//! with a retryable fault are repeated a bounded number of times. Closing
//! the scheduler, explicitly or by dropping it, always tries to leave the
//! strip dark before the bus is released.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::config::{RetryPolicy, SchedulerConfig};
use crate::error::{Result, SchedulerError, TransportError};
use crate::frame::Frame;
use crate::{BusTransport, FrameSource};

/// Timing of a completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// Wall-clock time since the previous tick
    pub elapsed: Duration,
    /// Total process time handed to the frame source
    pub process_time: Duration,
}

/// Drives a [`FrameSource`] into a [`BusTransport`].
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(renderer, transport);
/// let result = scheduler.run(&shutdown);
/// scheduler.close()?;
/// result?;
/// ```
pub struct FrameScheduler<S: FrameSource, T: BusTransport> {
    source: S,
    transport: T,
    config: SchedulerConfig,
    last_tick: Option<Instant>,
    process_time: Duration,
    closed: bool,
}

impl<S: FrameSource, T: BusTransport> FrameScheduler<S, T> {
    pub fn new(source: S, transport: T) -> Self {
        Self::with_config(source, transport, SchedulerConfig::default())
    }

    pub fn with_config(source: S, transport: T, config: SchedulerConfig) -> Self {
        Self {
            source,
            transport,
            config,
            last_tick: None,
            process_time: Duration::from_ticks(0),
            closed: false,
        }
    }

    /// Render one frame and flush it.
    ///
    /// `now` is the wall-clock time of this tick; the frame source sees the
    /// accumulated process time instead.
    pub fn tick(&mut self, now: Instant) -> Result<TickResult> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }

        let elapsed = self
            .last_tick
            .and_then(|last| now.checked_duration_since(last))
            .unwrap_or(Duration::from_ticks(0));
        self.last_tick = Some(now);
        self.process_time += elapsed;

        let frame = self
            .source
            .render(Instant::from_ticks(self.process_time.as_ticks()));
        write_with_retry(&mut self.transport, frame, self.config.retry)?;

        Ok(TickResult {
            elapsed,
            process_time: self.process_time,
        })
    }

    /// Tick until `shutdown` is set or a write fails for good.
    ///
    /// Returns the number of frames written. Does not close the bus.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<u64> {
        info!(leds = self.source.num_leds(), "render loop started");
        let mut frames = 0u64;
        while !shutdown.load(Ordering::Acquire) {
            self.tick(Instant::now())?;
            frames += 1;
            if self.config.pace.as_ticks() > 0 {
                sleep(self.config.pace);
            }
        }
        info!(frames, "render loop stopped");
        Ok(frames)
    }

    /// Write one all-off frame, then release the bus.
    ///
    /// Runs at most once; later calls return `Ok(())`.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        info!("clearing strip");
        let off = Frame::new(self.source.num_leds());
        let flushed = write_with_retry(&mut self.transport, &off, self.config.retry);
        if let Err(err) = &flushed {
            error!(error = %err, "failed to clear strip");
        }
        let released = self.transport.close().map_err(SchedulerError::from);
        flushed.and(released)
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<S: FrameSource, T: BusTransport> Drop for FrameScheduler<S, T> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            error!(error = %err, "bus cleanup failed");
        }
    }
}

fn write_with_retry<T: BusTransport>(
    transport: &mut T,
    frame: &Frame,
    policy: RetryPolicy,
) -> Result<()> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match transport.write(frame.as_bytes()) {
            Ok(()) => return Ok(()),
            Err(err) if !err.is_retryable() => return Err(err.into()),
            Err(err) if attempt >= attempts => {
                return Err(SchedulerError::BusFault {
                    attempts,
                    source: err,
                });
            }
            Err(err) => {
                warn!(attempt, error = %err, "bus write failed, retrying");
                sleep(policy.backoff);
                attempt += 1;
            }
        }
    }
}

fn sleep(duration: Duration) {
    std::thread::sleep(core::time::Duration::from_micros(duration.as_micros()));
}
