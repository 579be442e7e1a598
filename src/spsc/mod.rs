//! Blocking single-producer single-consumer channel.
//!
//! [`channel`] splits a [`BoundedBuffer`] into a [`Sender`] and a
//! [`Receiver`]. Neither handle is `Clone` or `Sync`, so at most one thread
//! ever puts and one thread ever gets, which is what makes the single-waiter
//! [`WakePolicy::One`] sound here.
//!
//! Dropping either handle closes the buffer. The receiver then drains what
//! is left and sees the end of the stream; the sender gets its item back.
//!
//! # Example
//! ```
//! use std::thread;
//! use bbuffer::spsc;
//!
//! let (tx, rx) = spsc::channel(4).unwrap();
//!
//! let producer = thread::spawn(move || {
//!     for i in 0..10 {
//!         tx.send(i).unwrap();
//!     }
//! });
//!
//! let received: Vec<i32> = rx.into_iter().collect();
//! producer.join().unwrap();
//! assert_eq!(received, (0..10).collect::<Vec<_>>());
//! ```

use std::cell::Cell;
use std::marker::PhantomData;

use crate::bounded_buffer::{BoundedBuffer, BufferError, WakePolicy};
use crate::sync::Arc;

mod receiver;
mod sender;

/// Keeps a handle `Send` while opting out of `Sync`.
type PhantomUnsync = PhantomData<Cell<&'static ()>>;

/// Creates a channel backed by a buffer of `capacity` slots.
///
/// # Errors
///
/// Fails if `capacity == 0` or the slots cannot be allocated.
pub fn channel<T>(capacity: usize) -> Result<(Sender<T>, Receiver<T>), BufferError> {
    let inner = Arc::new(BoundedBuffer::with_policy(capacity, WakePolicy::One)?);

    let sender = Sender {
        inner: Arc::clone(&inner),
        _unsync: PhantomData,
    };

    let receiver = Receiver {
        inner,
        _unsync: PhantomData,
    };

    Ok((sender, receiver))
}

pub use receiver::{IntoIter, Iter, Receiver};
pub use sender::Sender;

#[cfg(all(test, not(bbuffer_loom)))]
mod tests {
    use super::*;
    use crate::bounded_buffer::{GetTimeoutError, SendError, TryGetError, TryPutError};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            channel::<u8>(0).unwrap_err(),
            BufferError::ZeroCapacity
        );
    }

    #[test]
    fn basic_send_recv() {
        let (tx, rx) = channel(1).unwrap();
        tx.send(10).unwrap();
        assert_eq!(rx.recv(), Some(10));
    }

    #[test]
    fn full_and_empty() {
        let (tx, rx) = channel(2).unwrap();
        assert!(tx.try_send(42).is_ok());
        assert!(tx.try_send(43).is_ok());
        assert_eq!(tx.try_send(99), Err(TryPutError::Full(99)));
        assert_eq!(tx.len(), 2);
        assert_eq!(rx.try_recv(), Ok(42));
        assert_eq!(rx.try_recv(), Ok(43));
        assert_eq!(rx.try_recv(), Err(TryGetError::Empty));
    }

    #[test]
    fn dropping_sender_ends_stream_after_drain() {
        let (tx, rx) = channel(4).unwrap();
        tx.send('a').unwrap();
        tx.send('b').unwrap();
        drop(tx);

        assert_eq!(rx.recv(), Some('a'));
        assert_eq!(rx.recv(), Some('b'));
        assert_eq!(rx.recv(), None);
        assert_eq!(rx.try_recv(), Err(TryGetError::Closed));
    }

    #[test]
    fn dropping_receiver_fails_send() {
        let (tx, rx) = channel(4).unwrap();
        assert!(!tx.is_closed());
        drop(rx);

        assert!(tx.is_closed());
        assert_eq!(tx.send(1), Err(SendError(1)));
    }

    #[test]
    fn dropping_receiver_unblocks_full_sender() {
        let (tx, rx) = channel(1).unwrap();
        tx.send(1).unwrap();

        let producer = thread::spawn(move || tx.send(2));

        thread::sleep(Duration::from_millis(20));
        drop(rx);
        assert_eq!(producer.join().unwrap(), Err(SendError(2)));
    }

    #[test]
    fn recv_timeout_expires_on_empty() {
        let (_tx, rx) = channel::<u8>(1).unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(20)),
            Err(GetTimeoutError::Timeout)
        );
    }

    #[test]
    fn iterator_stops_at_end_of_stream() {
        let (tx, rx) = channel(3).unwrap();

        let producer = thread::spawn(move || {
            for c in "hello".chars() {
                tx.send(c).unwrap();
            }
        });

        let received: String = rx.iter().collect();
        producer.join().unwrap();
        assert_eq!(received, "hello");
    }

    #[test]
    fn multithreaded_send_recv() {
        let (tx, rx) = channel(16).unwrap();
        let t = thread::spawn(move || {
            for i in 0..100_000u64 {
                tx.send(i).unwrap();
            }
        });

        let sum: u64 = rx.into_iter().sum();
        t.join().unwrap();
        assert_eq!(sum, (0..100_000u64).sum());
    }
}
