use thiserror::Error;

/// Reasons a [`RingBuffer`](crate::RingBuffer) could not be constructed.
///
/// Construction is the only fallible operation of the crate. Once a ring
/// exists, running out of space or data is reported through short counts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateError {
    /// A ring needs at least one byte of backing storage.
    #[error("ring buffer capacity must be at least one byte")]
    ZeroCapacity,
    /// The caller supplied a backing buffer shorter than the requested
    /// capacity.
    #[error("backing buffer holds {len} bytes but {capacity} were requested")]
    BufferTooSmall {
        /// Length of the supplied buffer.
        len: usize,
        /// Requested ring capacity.
        capacity: usize,
    },
    /// The heap backend could not provide the requested number of bytes.
    #[error("could not allocate {0} bytes for the ring buffer")]
    AllocationFailed(usize),
    /// Every instance slot of the pool is leased.
    #[error("no free instance slot in the pool")]
    NoInstanceAvailable,
    /// No backend can provide a backing array of the requested size.
    #[error("no backing buffer available for {0} bytes")]
    NoBufferAvailable(usize),
}
