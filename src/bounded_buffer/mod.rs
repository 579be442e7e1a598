//! Fixed-capacity blocking circular buffer.
//!
//! A [`BoundedBuffer`] keeps its slots, both cursors and the item count behind
//! one mutex and parks callers on two condition variables: producers on
//! `not_full`, consumers on `not_empty`. Nothing ever spins; a full buffer
//! suspends `put`, an empty one suspends `get`.
//!
//! # Wake policy
//!
//! With [`WakePolicy::One`] every transition wakes a single waiter. That is
//! only correct when exactly one thread puts and exactly one thread gets: a
//! second producer could consume the only wake-up meant for the consumer and
//! leave both sides parked. [`WakePolicy::All`] broadcasts instead and lets
//! every waiter re-check its predicate, which is sound for any number of
//! producers and consumers. [`BoundedBuffer::new`] picks `All`; the
//! [`spsc`](crate::spsc) channel, whose handles cannot be shared, picks `One`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use bbuffer::BoundedBuffer;
//!
//! let buffer = Arc::new(BoundedBuffer::new(2).unwrap());
//!
//! let producer = {
//!     let buffer = Arc::clone(&buffer);
//!     thread::spawn(move || {
//!         for c in ['a', 'b', 'c'] {
//!             buffer.put(c);
//!         }
//!     })
//! };
//!
//! assert_eq!(buffer.get(), 'a');
//! assert_eq!(buffer.get(), 'b');
//! assert_eq!(buffer.get(), 'c');
//! producer.join().unwrap();
//! ```

use std::fmt;
use std::sync::PoisonError;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::sync::{Condvar, Mutex, MutexGuard};

pub mod error;
mod ring;

pub use error::{
    BufferError, GetTimeoutError, PutTimeoutError, SendError, TryGetError, TryPutError,
};
pub use ring::BufferState;

use ring::Ring;

/// How many waiters a state transition wakes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WakePolicy {
    /// Signal a single waiter. Only sound with one producer and one consumer.
    One,
    /// Broadcast to every waiter; each re-checks before proceeding.
    #[default]
    All,
}

/// A fixed-capacity FIFO shared between threads, blocking on full and empty.
pub struct BoundedBuffer<T> {
    ring: Mutex<Ring<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
    policy: WakePolicy,
}

impl<T> BoundedBuffer<T> {
    /// Creates an empty buffer with `capacity` slots, waking all waiters on
    /// every transition.
    ///
    /// # Errors
    ///
    /// [`BufferError::ZeroCapacity`] if `capacity == 0`,
    /// [`BufferError::Allocation`] if the slots cannot be reserved.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        Self::with_policy(capacity, WakePolicy::default())
    }

    /// Creates an empty buffer with an explicit [`WakePolicy`].
    ///
    /// # Errors
    ///
    /// Same as [`BoundedBuffer::new`].
    pub fn with_policy(capacity: usize, policy: WakePolicy) -> Result<Self, BufferError> {
        let ring = Ring::with_capacity(capacity)?;
        debug!(capacity, ?policy, "bounded buffer created");

        Ok(Self {
            ring: Mutex::new(ring),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
            policy,
        })
    }

    /// Enqueues `item`, blocking while every slot is occupied.
    ///
    /// Ignores [`close`](Self::close); use [`send`](Self::send) to stop
    /// waiting once the buffer is closed.
    pub fn put(&self, item: T) {
        let mut ring = self.lock();
        let mut item = item;

        loop {
            match ring.push(item) {
                Ok(()) => break,
                Err(rejected) => {
                    item = rejected;
                    trace!(capacity = self.capacity, "buffer full, producer parked");
                    ring = self.wait(&self.not_full, ring);
                }
            }
        }

        self.wake(&self.not_empty);
    }

    /// Dequeues the oldest item, blocking while the buffer is empty.
    ///
    /// Ignores [`close`](Self::close); use [`recv`](Self::recv) to observe
    /// the end of the stream.
    pub fn get(&self) -> T {
        let mut ring = self.lock();

        loop {
            if let Some(item) = ring.pop() {
                self.wake(&self.not_full);
                return item;
            }
            trace!("buffer empty, consumer parked");
            ring = self.wait(&self.not_empty, ring);
        }
    }

    /// Enqueues `item`, blocking while full, unless the buffer is or becomes
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns the item in [`SendError`] if the buffer is closed.
    pub fn send(&self, item: T) -> Result<(), SendError<T>> {
        let mut ring = self.lock();
        let mut item = item;

        loop {
            if ring.is_closed() {
                return Err(SendError(item));
            }
            match ring.push(item) {
                Ok(()) => {
                    self.wake(&self.not_empty);
                    return Ok(());
                }
                Err(rejected) => {
                    item = rejected;
                    trace!(capacity = self.capacity, "buffer full, sender parked");
                    ring = self.wait(&self.not_full, ring);
                }
            }
        }
    }

    /// Dequeues the oldest item, blocking while empty.
    ///
    /// Returns `None` once the buffer is closed and drained; items enqueued
    /// before the close are still delivered.
    pub fn recv(&self) -> Option<T> {
        let mut ring = self.lock();

        loop {
            if let Some(item) = ring.pop() {
                self.wake(&self.not_full);
                return Some(item);
            }
            if ring.is_closed() {
                return None;
            }
            trace!("buffer empty, receiver parked");
            ring = self.wait(&self.not_empty, ring);
        }
    }

    /// Enqueues `item` without blocking.
    ///
    /// # Errors
    ///
    /// [`TryPutError::Closed`] if the buffer is closed, [`TryPutError::Full`]
    /// if no slot is free. Both hand the item back.
    pub fn try_put(&self, item: T) -> Result<(), TryPutError<T>> {
        let mut ring = self.lock();
        if ring.is_closed() {
            return Err(TryPutError::Closed(item));
        }
        ring.push(item).map_err(TryPutError::Full)?;
        self.wake(&self.not_empty);
        Ok(())
    }

    /// Dequeues the oldest item without blocking.
    ///
    /// # Errors
    ///
    /// [`TryGetError::Empty`] if there is nothing to take,
    /// [`TryGetError::Closed`] if the buffer is closed and drained.
    pub fn try_get(&self) -> Result<T, TryGetError> {
        let mut ring = self.lock();
        match ring.pop() {
            Some(item) => {
                self.wake(&self.not_full);
                Ok(item)
            }
            None if ring.is_closed() => Err(TryGetError::Closed),
            None => Err(TryGetError::Empty),
        }
    }

    /// Enqueues `item`, waiting at most `timeout` for a free slot.
    ///
    /// # Errors
    ///
    /// [`PutTimeoutError::Timeout`] if the deadline passes while full,
    /// [`PutTimeoutError::Closed`] if the buffer is or becomes closed.
    pub fn put_timeout(&self, item: T, timeout: Duration) -> Result<(), PutTimeoutError<T>> {
        let deadline = Instant::now().checked_add(timeout);
        let mut ring = self.lock();
        let mut item = item;

        loop {
            if ring.is_closed() {
                return Err(PutTimeoutError::Closed(item));
            }
            match ring.push(item) {
                Ok(()) => {
                    self.wake(&self.not_empty);
                    return Ok(());
                }
                Err(rejected) => item = rejected,
            }
            ring = match self.wait_until(&self.not_full, ring, deadline) {
                Some(ring) => ring,
                None => return Err(PutTimeoutError::Timeout(item)),
            };
        }
    }

    /// Dequeues the oldest item, waiting at most `timeout` for one to arrive.
    ///
    /// # Errors
    ///
    /// [`GetTimeoutError::Timeout`] if the deadline passes while empty,
    /// [`GetTimeoutError::Closed`] if the buffer is closed and drained.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, GetTimeoutError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut ring = self.lock();

        loop {
            if let Some(item) = ring.pop() {
                self.wake(&self.not_full);
                return Ok(item);
            }
            if ring.is_closed() {
                return Err(GetTimeoutError::Closed);
            }
            ring = self
                .wait_until(&self.not_empty, ring, deadline)
                .ok_or(GetTimeoutError::Timeout)?;
        }
    }

    /// Closes the buffer and wakes every parked caller.
    ///
    /// Afterwards `send`-family calls fail and `recv`-family calls drain the
    /// remaining items, then report the end of the stream. Returns `true` if
    /// this call closed the buffer, `false` if it was already closed.
    pub fn close(&self) -> bool {
        let mut ring = self.lock();
        if !ring.close() {
            return false;
        }
        debug!(pending = ring.len(), "bounded buffer closed");
        self.not_full.notify_all();
        self.not_empty.notify_all();
        true
    }

    /// Consumes the buffer, returning the undelivered items oldest first.
    pub fn into_items(self) -> Vec<T> {
        self.ring
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_items()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn policy(&self) -> WakePolicy {
        self.policy
    }

    /// Number of items currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_closed()
    }

    pub fn state(&self) -> BufferState {
        self.lock().state()
    }

    // Every mutation restores the ring's invariants before it can panic, so a
    // poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(
        &self,
        condvar: &Condvar,
        ring: MutexGuard<'a, Ring<T>>,
    ) -> MutexGuard<'a, Ring<T>> {
        condvar.wait(ring).unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits on `condvar` until woken or `deadline` passes. `None` means the
    /// deadline has passed; a `None` deadline waits without limit.
    fn wait_until<'a>(
        &self,
        condvar: &Condvar,
        ring: MutexGuard<'a, Ring<T>>,
        deadline: Option<Instant>,
    ) -> Option<MutexGuard<'a, Ring<T>>> {
        let Some(deadline) = deadline else {
            return Some(self.wait(condvar, ring));
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return None;
        }

        let ring = match condvar.wait_timeout(ring, remaining) {
            Ok((ring, _)) => ring,
            Err(poisoned) => poisoned.into_inner().0,
        };
        Some(ring)
    }

    #[inline]
    fn wake(&self, condvar: &Condvar) {
        match self.policy {
            WakePolicy::One => condvar.notify_one(),
            WakePolicy::All => condvar.notify_all(),
        }
    }
}

impl<T> fmt::Debug for BoundedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.lock();
        f.debug_struct("BoundedBuffer")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("len", &ring.len())
            .field("closed", &ring.is_closed())
            .finish()
    }
}
