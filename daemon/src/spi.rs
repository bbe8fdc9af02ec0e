//! SPI bus transport (Linux spidev)

use std::io::{self, Write};
use std::path::Path;

use piano_backdrop::{BusTransport, TransportError};
use spidev::{SpiModeFlags, Spidev, SpidevOptions};
use tracing::info;

pub struct SpiTransport {
    spi: Option<Spidev>,
}

impl SpiTransport {
    /// Open `path` and clock it at `speed_hz`, mode 0, 8 bits per word.
    pub fn open(path: &Path, speed_hz: u32) -> io::Result<Self> {
        let mut spi = Spidev::open(path)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)?;
        info!(device = %path.display(), speed_hz, "SPI bus opened");
        Ok(Self { spi: Some(spi) })
    }
}

impl BusTransport for SpiTransport {
    fn write(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let spi = self.spi.as_mut().ok_or(TransportError::Closed)?;
        let written = spi.write(frame)?;
        TransportError::check_written(written, frame.len())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.spi.take().is_some() {
            info!("SPI bus closed");
        }
        Ok(())
    }
}
