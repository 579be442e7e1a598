use std::fmt;
use std::time::Duration;

use crate::bounded_buffer::{BoundedBuffer, GetTimeoutError, TryGetError};
use crate::spsc::PhantomUnsync;
use crate::sync::Arc;

/// The consuming half of a [`channel`](super::channel).
pub struct Receiver<T> {
    pub(super) inner: Arc<BoundedBuffer<T>>,
    pub(super) _unsync: PhantomUnsync,
}

impl<T> Receiver<T> {
    /// Receives the next item, blocking while the buffer is empty.
    ///
    /// Returns `None` once the sender is gone and every item has been taken.
    pub fn recv(&self) -> Option<T> {
        self.inner.recv()
    }

    pub fn try_recv(&self) -> Result<T, TryGetError> {
        self.inner.try_get()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, GetTimeoutError> {
        self.inner.get_timeout(timeout)
    }

    /// Blocking iterator over received items, ending with the stream.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { receiver: self }
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

    /// `true` once the sender is gone. Items may still be waiting.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver").field("inner", &*self.inner).finish()
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.inner.close();
    }
}

#[derive(Debug)]
pub struct Iter<'a, T> {
    receiver: &'a Receiver<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.recv()
    }
}

#[derive(Debug)]
pub struct IntoIter<T> {
    receiver: Receiver<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.recv()
    }
}

impl<T> IntoIterator for Receiver<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { receiver: self }
    }
}

impl<'a, T> IntoIterator for &'a Receiver<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
