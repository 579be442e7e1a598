//! Synchronization primitives used by the buffer.
//!
//! Under `--cfg bbuffer_loom` these resolve to loom's model-checked versions
//! so the same code paths can be explored exhaustively. The cfg name is
//! crate-specific: tokio changes its own API under plain `cfg(loom)`.

#[cfg(bbuffer_loom)]
pub(crate) use loom::sync::{Arc, Condvar, Mutex, MutexGuard};

#[cfg(not(bbuffer_loom))]
pub(crate) use std::sync::{Arc, Condvar, Mutex, MutexGuard};
