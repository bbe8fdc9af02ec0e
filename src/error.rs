//! Error types
use thiserror::Error;

/// Reasons a datagram is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// Datagram is not valid UTF-8
    #[error("datagram is not valid UTF-8")]
    NotUtf8,

    /// Field count other than 2 or 3
    #[error("unsupported field count: {0}")]
    FieldCount(usize),

    /// A field could not be parsed
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// Note outside the key table
    #[error("note {0} is outside 0..=127")]
    NoteOutOfRange(i64),

    /// Hue is NaN or infinite
    #[error("hue is not finite")]
    NonFiniteHue,
}

/// Bus write failures
#[derive(Error, Debug)]
pub enum TransportError {
    /// I/O error from the bus device
    #[error("bus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device accepted only part of the frame
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// The bus handle has already been released
    #[error("bus is closed")]
    Closed,
}

impl TransportError {
    /// Whether repeating the same write may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::ShortWrite { .. })
    }

    /// Turn the byte count of a device write into a result.
    pub fn check_written(written: usize, expected: usize) -> core::result::Result<(), Self> {
        if written < expected {
            Err(Self::ShortWrite { written, expected })
        } else {
            Ok(())
        }
    }
}

/// Render loop failures
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// A retryable fault persisted through every attempt
    #[error("bus write failed after {attempts} attempts")]
    BusFault {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// A fault that is not worth retrying
    #[error("bus transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type for render loop operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
