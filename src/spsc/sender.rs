use std::fmt;
use std::time::Duration;

use crate::bounded_buffer::{BoundedBuffer, PutTimeoutError, SendError, TryPutError};
use crate::spsc::PhantomUnsync;
use crate::sync::Arc;

/// The producing half of a [`channel`](super::channel).
pub struct Sender<T> {
    pub(super) inner: Arc<BoundedBuffer<T>>,
    pub(super) _unsync: PhantomUnsync,
}

impl<T> Sender<T> {
    /// Sends `item`, blocking while the buffer is full.
    ///
    /// # Errors
    ///
    /// Returns the item if the receiver has been dropped.
    pub fn send(&self, item: T) -> Result<(), SendError<T>> {
        self.inner.send(item)
    }

    /// Sends `item` if a slot is free right now.
    pub fn try_send(&self, item: T) -> Result<(), TryPutError<T>> {
        self.inner.try_put(item)
    }

    /// Sends `item`, waiting at most `timeout` for a free slot.
    pub fn send_timeout(&self, item: T, timeout: Duration) -> Result<(), PutTimeoutError<T>> {
        self.inner.put_timeout(item, timeout)
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// `true` once the receiver is gone.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl<T> fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender").field("inner", &*self.inner).finish()
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        self.inner.close();
    }
}
