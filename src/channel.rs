//! Bounded intent queue shared by the ingest and render threads.
//!
//! Built on `critical-section` and `heapless::Deque`. Producers never block:
//! when the queue is full the value is handed back and counted as dropped.
//! The consumer takes the whole backlog in one critical section and
//! processes it outside the lock.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;
use heapless::Deque;

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// A bounded, thread-safe channel.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
    dropped: AtomicU32,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
            dropped: AtomicU32::new(0),
        }
    }

    /// Get a sender handle for this channel.
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    /// Get a receiver handle for this channel.
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Try to push a value without blocking.
    ///
    /// Returns `Err(TrySendError(value))` and bumps the drop counter if the
    /// channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(value)
        })
        .map_err(|value| {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            TrySendError(value)
        })
    }

    /// Take everything queued so far, oldest first.
    pub fn take_pending(&self) -> Deque<T, SIZE> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            core::mem::replace(&mut *queue, Deque::new())
        })
    }

    /// Number of queued values.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values rejected because the queue was full, since the last call.
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// See [`Channel::try_send`].
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }
}

/// A receiver handle for a [`Channel`].
///
/// Only the render thread should hold one.
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    /// See [`Channel::take_pending`].
    pub fn take_pending(&self) -> Deque<T, SIZE> {
        self.channel.take_pending()
    }

    /// See [`Channel::take_dropped`].
    pub fn take_dropped(&self) -> u32 {
        self.channel.take_dropped()
    }
}
