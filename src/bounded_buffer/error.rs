use std::error::Error;
use std::fmt::Debug;
use thiserror::Error;

/// Error returned when a [`BoundedBuffer`](super::BoundedBuffer) cannot be constructed.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BufferError {
    /// A buffer needs at least one slot; with zero every `put` would block forever.
    #[error("buffer capacity must be at least 1")]
    ZeroCapacity,

    /// The slot storage could not be reserved.
    #[error("failed to allocate storage for {capacity} slots")]
    Allocation {
        /// The requested number of slots.
        capacity: usize,
    },
}

/// Error returned when sending into a buffer fails because it is closed.
///
/// `SendError<T>` wraps the value that was being sent, allowing the caller
/// to recover the item.
///
/// # Example
/// ```
/// use bbuffer::{spsc, SendError};
///
/// let (tx, rx) = spsc::channel::<i32>(2).unwrap();
/// drop(rx);
///
/// if let Err(SendError(value)) = tx.send(42) {
///     assert_eq!(value, 42);
/// }
/// ```
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("send failed, buffer is closed")]
pub struct SendError<T>(
    /// The value that failed to be sent
    pub T,
);

impl<T> From<SendError<T>> for Box<dyn Error + Send>
where
    T: Send + Debug + 'static,
{
    /// Converts a `SendError<T>` into a boxed dynamic error.
    ///
    /// # Example
    /// ```
    /// use bbuffer::SendError;
    /// use std::error::Error;
    ///
    /// let err: SendError<i32> = SendError(42);
    /// let boxed: Box<dyn Error + Send> = err.into();
    /// ```
    fn from(err: SendError<T>) -> Self {
        Box::new(err)
    }
}

/// Error returned by `try_put` / `try_send`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TryPutError<T> {
    /// Every slot is occupied.
    #[error("buffer is full")]
    Full(T),
    /// The buffer has been closed.
    #[error("buffer is closed")]
    Closed(T),
}

impl<T> TryPutError<T> {
    /// Returns the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(item) | Self::Closed(item) => item,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

/// Error returned by `put_timeout` / `send_timeout`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PutTimeoutError<T> {
    /// No slot became free before the deadline.
    #[error("timed out waiting for a free slot")]
    Timeout(T),
    /// The buffer has been closed.
    #[error("buffer is closed")]
    Closed(T),
}

impl<T> PutTimeoutError<T> {
    /// Returns the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            Self::Timeout(item) | Self::Closed(item) => item,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Error returned by `try_get` / `try_recv`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TryGetError {
    #[error("buffer is empty")]
    Empty,
    /// The buffer is closed and every item has been taken.
    #[error("buffer is closed and drained")]
    Closed,
}

/// Error returned by `get_timeout` / `recv_timeout`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GetTimeoutError {
    #[error("timed out waiting for an item")]
    Timeout,
    /// The buffer is closed and every item has been taken.
    #[error("buffer is closed and drained")]
    Closed,
}
