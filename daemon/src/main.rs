//! Keyboard backdrop daemon
//!
//! Listens for key events over UDP and drives the LED strip over SPI.

mod logging;
#[cfg(target_os = "linux")]
mod spi;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use piano_backdrop::config::DEFAULT_NUM_LEDS;
use piano_backdrop::frame::MAX_INTENSITY;
use piano_backdrop::ingest::DEFAULT_BIND;
use piano_backdrop::{
    BackdropConfig, BusTransport, DEFAULT_INTENT_CHANNEL_SIZE, Duration, FrameScheduler,
    FrameSource, IntentChannel, NullTransport, RainbowPattern, Renderer, RetryPolicy,
    SchedulerConfig, SharedColor, UdpIngestor,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "piano-backdrop")]
#[command(author, version, about = "LED strip backdrop for a musical keyboard", long_about = None)]
struct Cli {
    /// Address to receive key events on
    #[arg(long, default_value = DEFAULT_BIND)]
    bind: String,

    /// SPI device node
    #[arg(long, default_value = "/dev/spidev1.0")]
    spi_device: PathBuf,

    /// SPI clock rate in Hz
    #[arg(long, default_value_t = 8_000_000)]
    spi_speed: u32,

    /// Number of LEDs on the strip
    #[arg(long, default_value_t = DEFAULT_NUM_LEDS)]
    leds: usize,

    /// Intensity level (0-31) for lit keys
    #[arg(long, default_value_t = MAX_INTENSITY)]
    intensity: u8,

    /// Delay between frames in microseconds
    #[arg(long, default_value_t = 1000)]
    pace_us: u64,

    /// Attempts per frame before a bus fault is fatal
    #[arg(long, default_value_t = 3)]
    bus_attempts: u32,

    /// Show a scrolling rainbow instead of listening for keys
    #[arg(long)]
    test_pattern: bool,

    /// Render without touching the SPI bus
    #[arg(long)]
    dry_run: bool,

    /// Default log level; RUST_LOG overrides it
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            pace: Duration::from_micros(self.pace_us),
            retry: RetryPolicy {
                max_attempts: self.bus_attempts,
                ..RetryPolicy::default()
            },
        }
    }

    fn backdrop_config(&self) -> BackdropConfig {
        BackdropConfig {
            num_leds: self.leds,
            intensity: self.intensity.min(MAX_INTENSITY),
            ..BackdropConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::Release);
    })
    .context("failed to install signal handler")?;

    if cli.dry_run {
        info!("dry run, frames are discarded");
        return run(&cli, NullTransport, &shutdown);
    }
    run(&cli, open_bus(&cli)?, &shutdown)
}

#[cfg(target_os = "linux")]
fn open_bus(cli: &Cli) -> Result<spi::SpiTransport> {
    spi::SpiTransport::open(&cli.spi_device, cli.spi_speed)
        .with_context(|| format!("failed to open {}", cli.spi_device.display()))
}

#[cfg(not(target_os = "linux"))]
fn open_bus(_cli: &Cli) -> Result<NullTransport> {
    Err(anyhow!("SPI output is only supported on Linux; use --dry-run"))
}

fn run<T: BusTransport>(cli: &Cli, transport: T, shutdown: &AtomicBool) -> Result<()> {
    if cli.test_pattern {
        let scheduler = FrameScheduler::with_config(
            RainbowPattern::new(cli.leds),
            transport,
            cli.scheduler_config(),
        );
        return drive(scheduler, shutdown);
    }

    let intents = IntentChannel::<DEFAULT_INTENT_CHANNEL_SIZE>::new();
    let shared_color = SharedColor::default();
    let renderer = Renderer::new(intents.receiver(), &cli.backdrop_config())
        .with_shared_color(&shared_color);
    // The scheduler owns the bus from here on; dropping it clears the strip.
    let scheduler = FrameScheduler::with_config(renderer, transport, cli.scheduler_config());
    let ingestor = UdpIngestor::bind(cli.bind.as_str(), intents.sender())
        .with_context(|| format!("failed to bind {}", cli.bind))?;

    thread::scope(|scope| {
        let ingestor = &ingestor;
        let listener = scope.spawn(move || {
            let result = ingestor.run(shutdown);
            // Without input there is nothing left to show.
            shutdown.store(true, Ordering::Release);
            result
        });

        let rendered = drive(scheduler, shutdown);
        shutdown.store(true, Ordering::Release);

        let received = listener
            .join()
            .map_err(|_| anyhow!("ingestor thread panicked"))?;
        rendered?;
        received.context("ingestor failed")
    })
}

/// Run the render loop, then always clear the strip and release the bus.
fn drive<S: FrameSource, T: BusTransport>(
    mut scheduler: FrameScheduler<S, T>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let rendered = scheduler.run(shutdown);
    let cleared = scheduler.close();
    rendered.context("render loop failed")?;
    cleared.context("failed to clear strip")?;
    info!("strip cleared, bus released");
    Ok(())
}
