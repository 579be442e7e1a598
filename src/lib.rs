//! Fixed-capacity blocking buffers for handing items between threads.
//!
//! - [`BoundedBuffer`] - circular buffer guarded by one mutex, with blocking
//!   `put`/`get` and back-pressure in both directions
//! - [`spsc`] - single-producer single-consumer channel over a
//!   `BoundedBuffer`, closing when either side is dropped
//!
//! # Example
//!
//! ```
//! use bbuffer::BoundedBuffer;
//!
//! let buffer = BoundedBuffer::new(3).unwrap();
//! buffer.put('a');
//! buffer.put('b');
//! assert_eq!(buffer.get(), 'a');
//! assert_eq!(buffer.len(), 1);
//! ```

pub mod bounded_buffer;
pub mod spsc;
mod sync;

pub use bounded_buffer::{
    BoundedBuffer, BufferError, BufferState, GetTimeoutError, PutTimeoutError, SendError,
    TryGetError, TryPutError, WakePolicy,
};
