//! Fixed pool of ring buffer instances for targets without a heap.
//!
//! A [`RingPool`] owns `INSTANCES` slots. Each slot carries an occupancy flag
//! and a `SLOT_SIZE`-byte array that backs a ring when the caller does not
//! supply one. [`RingPool::create`] leases the first free slot; dropping the
//! returned [`RingBuffer`] gives the slot back.
//!
//! The pool is an ordinary value. Callers that want one pool for the whole
//! program keep it in their own state and pass references to it around.
//!
//! ```rust
//! use ringbyte::{CreateError, RingPool};
//!
//! let pool: RingPool<2, 64> = RingPool::new();
//! let rx = pool.create(64, None).unwrap();
//! let tx = pool.create(32, None).unwrap();
//! assert_eq!(pool.create(8, None).err(), Some(CreateError::NoInstanceAvailable));
//!
//! drop(rx);
//! assert_eq!(pool.available(), 1);
//! # drop(tx);
//! ```

use core::{
    cell::{Cell, RefCell, RefMut},
    fmt,
};

use crate::{CreateError, RingBuffer, storage::Storage};

/// Arena of `INSTANCES` ring buffer slots, each with `SLOT_SIZE` bytes of
/// backing storage.
///
/// With `SLOT_SIZE == 0` the pool only hands out instances over
/// caller-supplied arrays.
pub struct RingPool<const INSTANCES: usize, const SLOT_SIZE: usize> {
    leased: [Cell<bool>; INSTANCES],
    slots: [RefCell<[u8; SLOT_SIZE]>; INSTANCES],
}

impl<const INSTANCES: usize, const SLOT_SIZE: usize> RingPool<INSTANCES, SLOT_SIZE> {
    /// Creates a pool with every slot free.
    #[must_use]
    pub fn new() -> Self {
        Self {
            leased: core::array::from_fn(|_| Cell::new(false)),
            slots: core::array::from_fn(|_| RefCell::new([0; SLOT_SIZE])),
        }
    }

    /// Total number of instance slots.
    #[must_use]
    pub const fn instances(&self) -> usize {
        INSTANCES
    }

    /// Size of the backing array each slot can provide.
    #[must_use]
    pub const fn slot_size(&self) -> usize {
        SLOT_SIZE
    }

    /// Number of slots currently leased.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.leased.iter().filter(|leased| leased.get()).count()
    }

    /// Number of slots free for [`create`](Self::create).
    #[must_use]
    pub fn available(&self) -> usize {
        INSTANCES - self.in_use()
    }

    /// Leases the first free slot and builds a ring of `capacity` bytes on
    /// it.
    ///
    /// A supplied `buffer` is borrowed (its first `capacity` bytes); otherwise
    /// the slot's own array backs the ring. The slot returns to the pool when
    /// the ring is dropped. On failure the pool is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`CreateError::ZeroCapacity`] when `capacity` is zero.
    /// - [`CreateError::NoInstanceAvailable`] when every slot is leased.
    /// - [`CreateError::BufferTooSmall`] when `buffer` is shorter than
    ///   `capacity`.
    /// - [`CreateError::NoBufferAvailable`] when no buffer is supplied and
    ///   `capacity` exceeds `SLOT_SIZE`.
    pub fn create<'a>(
        &'a self,
        capacity: usize,
        buffer: Option<&'a mut [u8]>,
    ) -> Result<RingBuffer<'a>, CreateError> {
        self.lease(capacity, buffer)
            .inspect_err(|err| log::warn!("pooled ring buffer not created: {err}"))
    }

    fn lease<'a>(
        &'a self,
        capacity: usize,
        buffer: Option<&'a mut [u8]>,
    ) -> Result<RingBuffer<'a>, CreateError> {
        if capacity == 0 {
            return Err(CreateError::ZeroCapacity);
        }
        let index = self
            .leased
            .iter()
            .position(|leased| !leased.get())
            .ok_or(CreateError::NoInstanceAvailable)?;

        let storage = match buffer {
            Some(buffer) => Storage::borrow_prefix(buffer, capacity)?,
            None if capacity <= SLOT_SIZE => {
                // A free flag means no ring holds this slot's array.
                let slot = self.slots[index]
                    .try_borrow_mut()
                    .map_err(|_| CreateError::NoBufferAvailable(capacity))?;
                Storage::Pooled(RefMut::map(slot, |bytes| &mut bytes[..capacity]))
            }
            None => return Err(CreateError::NoBufferAvailable(capacity)),
        };

        let lease = SlotLease::acquire(&self.leased[index], index);
        RingBuffer::from_parts(storage, Some(lease))
    }
}

impl<const INSTANCES: usize, const SLOT_SIZE: usize> Default for RingPool<INSTANCES, SLOT_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const INSTANCES: usize, const SLOT_SIZE: usize> fmt::Debug for RingPool<INSTANCES, SLOT_SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingPool")
            .field("instances", &INSTANCES)
            .field("slot_size", &SLOT_SIZE)
            .field("in_use", &self.in_use())
            .finish()
    }
}

/// Occupancy of one pool slot, held by the ring built on it.
pub(crate) struct SlotLease<'a> {
    leased: &'a Cell<bool>,
    index: usize,
}

impl<'a> SlotLease<'a> {
    fn acquire(leased: &'a Cell<bool>, index: usize) -> Self {
        leased.set(true);
        log::trace!("leased pool slot {index}");
        Self { leased, index }
    }
}

impl Drop for SlotLease<'_> {
    fn drop(&mut self) {
        self.leased.set(false);
        log::trace!("returned pool slot {}", self.index);
    }
}
