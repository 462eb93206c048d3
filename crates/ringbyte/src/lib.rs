//! A fixed-capacity circular byte buffer.
//!
//! [`RingBuffer`] stores bytes first-in first-out in a contiguous array of a
//! size fixed at construction. Writes and reads saturate instead of failing:
//! they report how many bytes were actually moved. Inspection (`peek`,
//! `count`, `search`) never mutates the buffer, and `read_until` drains up to a
//! delimiter byte only when that delimiter is already present.
//!
//! One slot of the backing array is always left unoccupied so that `head` and
//! `tail` alone tell an empty buffer from a full one; a ring built over `N`
//! bytes holds at most `N - 1`.
//!
//! The backing array can come from the heap ([`RingBuffer::new`], feature
//! `alloc`), from the caller ([`RingBuffer::from_slice`]), or from a
//! [`RingPool`] of preallocated instances for targets without an allocator.
//!
//! ```rust
//! use ringbyte::RingBuffer;
//!
//! let mut backing = [0u8; 17];
//! let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
//! assert_eq!(rb.write(b"hello dear world"), 16);
//! assert!(rb.is_full());
//! assert_eq!(rb.search(b"dear"), Some(6));
//!
//! let mut line = [0u8; 16];
//! assert_eq!(rb.read_until(&mut line, b' '), 6);
//! assert_eq!(&line[..6], b"hello ");
//! ```

#![no_std]
#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod inspect;
#[cfg(feature = "std")]
mod io;
mod pool;
mod ring;
mod storage;

#[cfg(all(test, feature = "alloc"))]
mod tests;

pub use error::CreateError;
pub use inspect::Iter;
pub use pool::RingPool;
pub use ring::RingBuffer;

/// Version of this library, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
