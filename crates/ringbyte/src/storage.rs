#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec::Vec};
use core::cell::RefMut;

use crate::CreateError;

/// Where the bytes of a ring live.
///
/// Release is decided by the variant: owned arrays are freed, pooled arrays
/// return to their slot when the `RefMut` drops, and borrowed arrays are left
/// to the caller.
pub(crate) enum Storage<'a> {
    #[cfg(feature = "alloc")]
    Owned(Box<[u8]>),
    Borrowed(&'a mut [u8]),
    Pooled(RefMut<'a, [u8]>),
}

impl Storage<'_> {
    /// Allocates `capacity` zeroed bytes, reporting allocator failure instead
    /// of aborting.
    #[cfg(feature = "alloc")]
    pub(crate) fn allocate(capacity: usize) -> Result<Self, CreateError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| CreateError::AllocationFailed(capacity))?;
        bytes.resize(capacity, 0);
        Ok(Storage::Owned(bytes.into_boxed_slice()))
    }

    /// Borrows the first `capacity` bytes of a caller buffer.
    pub(crate) fn borrow_prefix<'b>(
        buffer: &'b mut [u8],
        capacity: usize,
    ) -> Result<Storage<'b>, CreateError> {
        let len = buffer.len();
        match buffer.get_mut(..capacity) {
            Some(bytes) => Ok(Storage::Borrowed(bytes)),
            None => Err(CreateError::BufferTooSmall { len, capacity }),
        }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        match self {
            #[cfg(feature = "alloc")]
            Storage::Owned(bytes) => bytes,
            Storage::Borrowed(bytes) => bytes,
            Storage::Pooled(bytes) => bytes,
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            #[cfg(feature = "alloc")]
            Storage::Owned(bytes) => bytes,
            Storage::Borrowed(bytes) => bytes,
            Storage::Pooled(bytes) => bytes,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub(crate) fn backend(&self) -> &'static str {
        match self {
            #[cfg(feature = "alloc")]
            Storage::Owned(_) => "heap",
            Storage::Borrowed(_) => "borrowed",
            Storage::Pooled(_) => "pool",
        }
    }
}
