//! UDP key event ingestor
//!
//! Blocks on the socket, parses each datagram and queues a key intent.
//! Bad datagrams are logged and dropped; a full queue drops the event.

use core::sync::atomic::{AtomicBool, Ordering};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use embassy_time::{Duration, Instant};
use tracing::{debug, info, trace};

use crate::intent_processor::{Intent, IntentSender};
use crate::protocol::parse_datagram;

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:5005";

/// Largest datagram read in one go.
pub const MAX_DATAGRAM: usize = 1024;

/// How often a blocked receive wakes up to check for shutdown.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct UdpIngestor<'a, const SIZE: usize> {
    socket: UdpSocket,
    intents: IntentSender<'a, SIZE>,
}

impl<'a, const SIZE: usize> UdpIngestor<'a, SIZE> {
    pub fn bind(addr: impl ToSocketAddrs, intents: IntentSender<'a, SIZE>) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(core::time::Duration::from_micros(
            DEFAULT_POLL_INTERVAL.as_micros(),
        )))?;
        info!(addr = %socket.local_addr()?, "listening for key events");
        Ok(Self { socket, intents })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive until `shutdown` is set.
    pub fn run(&self, shutdown: &AtomicBool) -> io::Result<()> {
        let mut buf = [0u8; MAX_DATAGRAM];
        while !shutdown.load(Ordering::Acquire) {
            match self.socket.recv_from(&mut buf) {
                Ok((len, from)) => {
                    trace!(%from, len, "datagram received");
                    self.handle_datagram(&buf[..len], Instant::now());
                }
                Err(err)
                    if matches!(
                        err.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::Interrupted
                    ) => {}
                Err(err) => return Err(err),
            }
        }
        info!("ingestor stopped");
        Ok(())
    }

    /// Parse and queue one datagram.
    ///
    /// Returns `true` if an intent was queued.
    pub fn handle_datagram(&self, data: &[u8], at: Instant) -> bool {
        let event = match parse_datagram(data, at) {
            Ok(event) => event,
            Err(err) => {
                debug!(error = %err, "dropping datagram");
                return false;
            }
        };
        if self.intents.try_send(Intent::Key(event)).is_err() {
            debug!(note = event.note, "intent queue full, dropping key event");
            return false;
        }
        true
    }
}
