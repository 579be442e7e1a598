//! Lock-protected state of a bounded buffer.
//!
//! `Ring` is a plain single-threaded circular queue. It is only ever touched
//! through the buffer's mutex, so none of its methods synchronize.

use super::error::BufferError;

/// Occupancy of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// No items (`len == 0`).
    Empty,
    /// Some items, some free slots.
    Partial,
    /// Every slot occupied (`len == capacity`).
    Full,
}

#[derive(Debug)]
pub(crate) struct Ring<T> {
    slots: Box<[Option<T>]>,
    /// Next slot to write ("in").
    write: usize,
    /// Next slot to read ("out").
    read: usize,
    count: usize,
    closed: bool,
}

impl<T> Ring<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| BufferError::Allocation { capacity })?;
        slots.resize_with(capacity, || None);

        Ok(Self {
            slots: slots.into_boxed_slice(),
            write: 0,
            read: 0,
            count: 0,
            closed: false,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    pub(crate) fn state(&self) -> BufferState {
        if self.is_empty() {
            BufferState::Empty
        } else if self.is_full() {
            BufferState::Full
        } else {
            BufferState::Partial
        }
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// Marks the ring closed. Returns `false` if it already was.
    pub(crate) fn close(&mut self) -> bool {
        !std::mem::replace(&mut self.closed, true)
    }

    #[inline]
    fn advance(&self, cursor: usize) -> usize {
        (cursor + 1) % self.capacity()
    }

    /// Stores `item` at the write cursor, or hands it back if every slot is taken.
    pub(crate) fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }

        self.slots[self.write] = Some(item);
        self.write = self.advance(self.write);
        self.count += 1;

        debug_assert!(self.cursors_consistent());
        debug_assert!(self.slots[self.read].is_some());
        Ok(())
    }

    /// Takes the item at the read cursor.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = self.slots[self.read].take()?;
        self.read = self.advance(self.read);
        self.count -= 1;

        debug_assert!(self.cursors_consistent());
        debug_assert!(self.slots[self.write].is_none());
        Some(item)
    }

    /// Consumes the ring, returning the undelivered items oldest first.
    pub(crate) fn into_items(mut self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.count);
        while let Some(item) = self.pop() {
            items.push(item);
        }
        items
    }

    /// `count` within bounds and `write == (read + count) mod capacity`.
    #[inline]
    fn cursors_consistent(&self) -> bool {
        let capacity = self.capacity();
        self.count <= capacity
            && self.read < capacity
            && self.write == (self.read + self.count) % capacity
    }

    /// Cursor consistency plus: exactly the slots in the `read..read + count`
    /// window are occupied. Walks every slot.
    #[cfg(all(test, not(bbuffer_loom)))]
    pub(crate) fn invariants_hold(&self) -> bool {
        let capacity = self.capacity();
        self.cursors_consistent()
            && (0..capacity).all(|offset| {
                let slot = (self.read + offset) % capacity;
                self.slots[slot].is_some() == (offset < self.count)
            })
    }
}

#[cfg(all(test, not(bbuffer_loom)))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn rejects_zero_capacity() {
        assert_eq!(
            Ring::<u8>::with_capacity(0).unwrap_err(),
            BufferError::ZeroCapacity
        );
    }

    #[test]
    fn starts_empty() {
        let ring = Ring::<u8>::with_capacity(4).unwrap();
        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.state(), BufferState::Empty);
        assert!(ring.invariants_hold());
    }

    #[test]
    fn push_rejects_when_full() {
        let mut ring = Ring::with_capacity(2).unwrap();
        assert!(ring.push('a').is_ok());
        assert_eq!(ring.state(), BufferState::Partial);
        assert!(ring.push('b').is_ok());
        assert_eq!(ring.state(), BufferState::Full);
        assert_eq!(ring.push('c'), Err('c'));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn cursors_wrap_around() {
        let mut ring = Ring::with_capacity(3).unwrap();

        for round in 0..5u32 {
            for i in 0..3 {
                ring.push(round * 10 + i).unwrap();
            }
            for i in 0..3 {
                assert_eq!(ring.pop(), Some(round * 10 + i));
            }
            assert_eq!(ring.pop(), None);
            assert!(ring.invariants_hold());
        }
    }

    #[test]
    fn interleaved_push_pop_keeps_order() {
        let mut ring = Ring::with_capacity(2).unwrap();

        ring.push(1).unwrap();
        ring.push(2).unwrap();
        assert_eq!(ring.pop(), Some(1));
        ring.push(3).unwrap();
        assert_eq!(ring.pop(), Some(2));
        ring.push(4).unwrap();
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), Some(4));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn occupied_window_tracks_every_step() {
        let mut ring = Ring::with_capacity(5).unwrap();

        for i in 0..40u32 {
            if i % 3 == 2 {
                ring.pop();
            } else if ring.push(i).is_err() {
                ring.pop();
            }
            assert!(ring.invariants_hold(), "step {i}");
        }
    }

    #[test]
    fn into_items_returns_oldest_first() {
        let mut ring = Ring::with_capacity(3).unwrap();
        ring.push('x').unwrap();
        ring.pop();
        ring.push('a').unwrap();
        ring.push('b').unwrap();
        ring.push('c').unwrap();

        assert_eq!(ring.into_items(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn close_is_idempotent() {
        let mut ring = Ring::<u8>::with_capacity(1).unwrap();
        assert!(!ring.is_closed());
        assert!(ring.close());
        assert!(!ring.close());
        assert!(ring.is_closed());
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn drops_undelivered_items_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut ring = Ring::with_capacity(4).unwrap();

        for _ in 0..3 {
            assert!(ring.push(DropCounter(Arc::clone(&drops))).is_ok());
        }
        drop(ring.pop());
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        drop(ring);
        assert_eq!(drops.load(Ordering::SeqCst), 3);
    }
}
