//! Ring buffer engine: index arithmetic and the mutating operations.
//!
//! Invariants
//! - `capacity() >= 1`, `head < capacity()` and `tail < capacity()`.
//! - The logical content is the `(head - tail) mod capacity` bytes starting at
//!   `tail`, wrapping at the end of the backing array.
//! - `head == tail` means empty; `tail == (head + 1) mod capacity` means full,
//!   so one slot of the backing array is never occupied.
//!
//! Writes and reads never fail. When the ring runs out of space or data they
//! stop early and return the number of bytes actually moved.

use core::{fmt, ops::Range};

use bstr::BStr;

use crate::{CreateError, pool::SlotLease, storage::Storage};

/// Fixed-capacity FIFO of bytes over a contiguous backing array.
///
/// The lifetime `'a` is that of a borrowed or pooled backing array; rings
/// created with [`RingBuffer::new`] are `RingBuffer<'static>`.
pub struct RingBuffer<'a> {
    storage: Storage<'a>,
    /// Next write position.
    head: usize,
    /// Next read position.
    tail: usize,
    lease: Option<SlotLease<'a>>,
}

impl RingBuffer<'static> {
    /// Creates a ring over `capacity` heap-allocated bytes.
    ///
    /// The ring holds at most `capacity - 1` bytes.
    ///
    /// # Errors
    ///
    /// [`CreateError::ZeroCapacity`] when `capacity` is zero and
    /// [`CreateError::AllocationFailed`] when the allocator refuses the
    /// request.
    #[cfg(feature = "alloc")]
    pub fn new(capacity: usize) -> Result<Self, CreateError> {
        Self::with_buffer(capacity, None)
    }
}

impl<'a> RingBuffer<'a> {
    /// Creates a ring over the whole of a caller-supplied array.
    ///
    /// The array is borrowed for the lifetime of the ring and is never freed
    /// by it. Its previous contents are ignored.
    ///
    /// # Errors
    ///
    /// [`CreateError::ZeroCapacity`] when `buffer` is empty.
    pub fn from_slice(buffer: &'a mut [u8]) -> Result<Self, CreateError> {
        let capacity = buffer.len();
        Self::with_buffer(capacity, Some(buffer))
    }

    /// Creates a ring of `capacity` bytes, borrowing `buffer` when one is
    /// supplied and allocating otherwise.
    ///
    /// Only the first `capacity` bytes of a supplied buffer are used.
    ///
    /// # Errors
    ///
    /// - [`CreateError::ZeroCapacity`] when `capacity` is zero.
    /// - [`CreateError::BufferTooSmall`] when `buffer` is shorter than
    ///   `capacity`.
    /// - [`CreateError::AllocationFailed`] when no buffer is supplied and the
    ///   allocator refuses the request.
    /// - [`CreateError::NoBufferAvailable`] when no buffer is supplied and the
    ///   crate was built without the `alloc` feature.
    pub fn with_buffer(
        capacity: usize,
        buffer: Option<&'a mut [u8]>,
    ) -> Result<Self, CreateError> {
        if capacity == 0 {
            log::warn!("ring buffer not created: zero capacity");
            return Err(CreateError::ZeroCapacity);
        }
        let storage = match buffer {
            Some(buffer) => Storage::borrow_prefix(buffer, capacity),
            #[cfg(feature = "alloc")]
            None => Storage::allocate(capacity),
            #[cfg(not(feature = "alloc"))]
            None => Err(CreateError::NoBufferAvailable(capacity)),
        };
        storage
            .and_then(|storage| Self::from_parts(storage, None))
            .inspect_err(|err| log::warn!("ring buffer not created: {err}"))
    }

    pub(crate) fn from_parts(
        storage: Storage<'a>,
        lease: Option<SlotLease<'a>>,
    ) -> Result<Self, CreateError> {
        if storage.len() == 0 {
            return Err(CreateError::ZeroCapacity);
        }
        log::debug!(
            "created ring buffer: {} bytes, {} backend",
            storage.len(),
            storage.backend()
        );
        Ok(Self {
            storage,
            head: 0,
            tail: 0,
            lease,
        })
    }

    /// Releases the ring.
    ///
    /// Heap storage is freed, pool slots are returned, and borrowed arrays
    /// are handed back to the caller untouched. Equivalent to dropping the
    /// ring.
    pub fn destroy(self) {
        drop(self);
    }

    /// Size of the backing array. The ring holds at most `capacity() - 1`
    /// bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn used_space(&self) -> usize {
        let capacity = self.capacity();
        (self.head + capacity - self.tail) % capacity
    }

    /// Number of bytes that can be written before the ring is full.
    #[must_use]
    pub fn available_space(&self) -> usize {
        self.capacity() - self.used_space() - 1
    }

    /// Whether no further byte can be written.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.tail == self.wrap(self.head + 1)
    }

    /// Whether there is nothing to read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Appends as much of `data` as fits and returns the number of bytes
    /// written.
    ///
    /// A short count means the ring became full; it is not an error.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.available_space());
        let (front, back) = self.spans(self.head, n);
        let split = front.len();
        let bytes = self.storage.as_mut_slice();
        bytes[front].copy_from_slice(&data[..split]);
        bytes[back].copy_from_slice(&data[split..n]);
        self.head = self.wrap(self.head + n);
        n
    }

    /// Appends up to `count` zero bytes, reserving space without a source.
    ///
    /// Returns the number of bytes written.
    pub fn write_zeroes(&mut self, count: usize) -> usize {
        let n = count.min(self.available_space());
        let (front, back) = self.spans(self.head, n);
        let bytes = self.storage.as_mut_slice();
        bytes[front].fill(0);
        bytes[back].fill(0);
        self.head = self.wrap(self.head + n);
        n
    }

    /// Moves up to `output.len()` bytes out of the ring into `output`.
    ///
    /// Returns the number of bytes read; a short count means the ring became
    /// empty.
    pub fn read(&mut self, output: &mut [u8]) -> usize {
        let n = self.peek(output);
        self.tail = self.wrap(self.tail + n);
        n
    }

    /// Drops up to `count` bytes from the front of the ring without copying
    /// them anywhere.
    ///
    /// Returns the number of bytes dropped.
    pub fn discard(&mut self, count: usize) -> usize {
        let n = count.min(self.used_space());
        self.tail = self.wrap(self.tail + n);
        n
    }

    /// Reads bytes up to and including the first `token`.
    ///
    /// Nothing is read when `token` is not in the ring, so a missing delimiter
    /// never leaves a half-drained frame behind. When `output` is shorter
    /// than the frame, only `output.len()` bytes are read and the token stays
    /// in the ring.
    ///
    /// Returns the number of bytes read, the token included.
    pub fn read_until(&mut self, output: &mut [u8], token: u8) -> usize {
        let Some(position) = self.search(core::slice::from_ref(&token)) else {
            return 0;
        };
        let n = output.len().min(position + 1);
        self.read(&mut output[..n])
    }

    /// Drops bytes up to and including the first `token`.
    ///
    /// Nothing is dropped when `token` is not in the ring. Returns the number
    /// of bytes dropped, the token included.
    pub fn discard_until(&mut self, token: u8) -> usize {
        match self.search(core::slice::from_ref(&token)) {
            Some(position) => self.discard(position + 1),
            None => 0,
        }
    }

    /// Empties the ring by resetting both indices.
    ///
    /// The backing bytes are left as they are and get overwritten by later
    /// writes.
    pub fn flush(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        self.storage.as_slice()
    }

    pub(crate) fn tail(&self) -> usize {
        self.tail
    }

    pub(crate) fn head(&self) -> usize {
        self.head
    }

    pub(crate) fn wrap(&self, index: usize) -> usize {
        index % self.capacity()
    }

    /// Splits `len` bytes starting at physical `start` into the run before
    /// the end of the array and the run wrapped to its beginning.
    pub(crate) fn spans(&self, start: usize, len: usize) -> (Range<usize>, Range<usize>) {
        let first = (self.capacity() - start).min(len);
        (start..start + first, 0..len - first)
    }

    /// Panics if the cursors or the space accounting are inconsistent.
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        let capacity = self.capacity();
        assert!(self.head < capacity, "head {} out of {capacity}", self.head);
        assert!(self.tail < capacity, "tail {} out of {capacity}", self.tail);
        assert_eq!(self.used_space() + self.available_space(), capacity - 1);
        assert_eq!(self.is_empty(), self.used_space() == 0);
        assert_eq!(self.is_full(), self.available_space() == 0);
    }
}

impl Drop for RingBuffer<'_> {
    fn drop(&mut self) {
        log::debug!(
            "releasing ring buffer: {} bytes, {} backend{}",
            self.capacity(),
            self.storage.backend(),
            match &self.lease {
                Some(_) => ", pool slot returned",
                None => "",
            }
        );
    }
}

impl fmt::Debug for RingBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (front, back) = self.as_slices();
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("front", &BStr::new(front))
            .field("back", &BStr::new(back))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn starts_empty() {
        let mut backing = [0xAAu8; 8];
        let rb = RingBuffer::from_slice(&mut backing).unwrap();
        assert!(rb.is_empty());
        assert!(!rb.is_full());
        assert_eq!(rb.capacity(), 8);
        assert_eq!(rb.used_space(), 0);
        assert_eq!(rb.available_space(), 7);
    }

    #[test]
    fn single_byte_ring_is_empty_and_full() {
        let mut backing = [0u8; 1];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        assert!(rb.is_empty());
        assert!(rb.is_full());
        assert_eq!(rb.available_space(), 0);
        assert_eq!(rb.write(b"x"), 0);
        assert_eq!(rb.read(&mut [0u8; 1]), 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut backing = [0u8; 0];
        assert_eq!(
            RingBuffer::from_slice(&mut backing).err(),
            Some(CreateError::ZeroCapacity)
        );
        assert_eq!(
            RingBuffer::with_buffer(0, None).err(),
            Some(CreateError::ZeroCapacity)
        );
    }

    #[test]
    fn short_caller_buffer_is_rejected() {
        let mut backing = [0u8; 4];
        assert_eq!(
            RingBuffer::with_buffer(5, Some(&mut backing)).err(),
            Some(CreateError::BufferTooSmall { len: 4, capacity: 5 })
        );
    }

    #[cfg(not(feature = "alloc"))]
    #[test]
    fn without_alloc_a_buffer_must_be_supplied() {
        assert_eq!(
            RingBuffer::with_buffer(8, None).err(),
            Some(CreateError::NoBufferAvailable(8))
        );
        let mut backing = [0u8; 8];
        let rb = RingBuffer::with_buffer(8, Some(&mut backing)).unwrap();
        assert_eq!(rb.capacity(), 8);
    }

    #[test]
    fn with_buffer_uses_only_the_requested_prefix() {
        let mut backing = [0u8; 32];
        let rb = RingBuffer::with_buffer(10, Some(&mut backing)).unwrap();
        assert_eq!(rb.capacity(), 10);
        assert_eq!(rb.available_space(), 9);
    }

    #[rstest]
    #[case(2, 5, 1)]
    #[case(8, 3, 3)]
    #[case(8, 7, 7)]
    #[case(8, 20, 7)]
    #[case(17, 16, 16)]
    fn write_saturates(
        #[case] capacity: usize,
        #[case] len: usize,
        #[case] expected: usize,
    ) {
        let mut backing = [0u8; 32];
        let mut rb = RingBuffer::with_buffer(capacity, Some(&mut backing)).unwrap();
        let data = [b'z'; 32];
        assert_eq!(rb.write(&data[..len]), expected);
        assert_eq!(rb.used_space(), expected);
        assert_eq!(rb.is_full(), expected == capacity - 1);
    }

    #[test]
    fn write_then_read_preserves_order() {
        let mut backing = [0u8; 16];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        assert_eq!(rb.write(b"hello"), 5);
        assert_eq!(rb.write(b" world"), 6);
        let mut out = [0u8; 32];
        assert_eq!(rb.read(&mut out), 11);
        assert_eq!(&out[..11], b"hello world");
        assert!(rb.is_empty());
    }

    #[test]
    fn read_is_bounded_by_output() {
        let mut backing = [0u8; 16];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"abcdef");
        let mut out = [0u8; 4];
        assert_eq!(rb.read(&mut out), 4);
        assert_eq!(&out, b"abcd");
        assert_eq!(rb.used_space(), 2);
    }

    #[test]
    fn write_wraps_across_the_array_end() {
        let mut backing = [0u8; 8];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"abcdef");
        rb.discard(5);
        assert_eq!(rb.write(b"ghijk"), 5);
        assert_eq!((rb.tail(), rb.head()), (5, 3));
        let mut out = [0u8; 8];
        assert_eq!(rb.read(&mut out), 6);
        assert_eq!(&out[..6], b"fghijk");
    }

    #[test]
    fn write_zeroes_reserves_space() {
        let mut backing = [0xFFu8; 8];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        assert_eq!(rb.write_zeroes(3), 3);
        assert_eq!(rb.write(b"ab"), 2);
        assert_eq!(rb.write_zeroes(10), 2);
        assert!(rb.is_full());
        let mut out = [0xEEu8; 7];
        assert_eq!(rb.read(&mut out), 7);
        assert_eq!(&out, b"\0\0\0ab\0\0");
    }

    #[test]
    fn discard_drains_without_copying() {
        let mut backing = [0u8; 8];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"abcdef");
        assert_eq!(rb.discard(4), 4);
        assert_eq!(rb.used_space(), 2);
        assert_eq!(rb.discard(10), 2);
        assert!(rb.is_empty());
        assert_eq!(rb.discard(1), 0);
    }

    #[test]
    fn read_until_includes_the_token() {
        let mut backing = [0u8; 32];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"cmd one\ncmd two\n");
        let mut line = [0u8; 32];
        assert_eq!(rb.read_until(&mut line, b'\n'), 8);
        assert_eq!(&line[..8], b"cmd one\n");
        assert_eq!(rb.read_until(&mut line, b'\n'), 8);
        assert_eq!(&line[..8], b"cmd two\n");
        assert!(rb.is_empty());
    }

    #[test]
    fn read_until_without_token_reads_nothing() {
        let mut backing = [0u8; 32];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"partial frame");
        let mut line = [0u8; 32];
        assert_eq!(rb.read_until(&mut line, b'\n'), 0);
        assert_eq!(rb.used_space(), 13);
    }

    #[test]
    fn read_until_respects_output_length() {
        let mut backing = [0u8; 32];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"abcdef;");
        let mut out = [0u8; 4];
        assert_eq!(rb.read_until(&mut out, b';'), 4);
        assert_eq!(&out, b"abcd");
        assert_eq!(rb.read_until(&mut out, b';'), 3);
        assert_eq!(&out[..3], b"ef;");
    }

    #[test]
    fn discard_until_drops_through_the_token() {
        let mut backing = [0u8; 32];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"noise\0payload");
        assert_eq!(rb.discard_until(b'#'), 0);
        assert_eq!(rb.discard_until(0), 6);
        let mut out = [0u8; 16];
        assert_eq!(rb.read(&mut out), 7);
        assert_eq!(&out[..7], b"payload");
    }

    #[test]
    fn flush_is_idempotent() {
        let mut backing = [0u8; 8];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"abc");
        rb.discard(1);
        rb.flush();
        assert!(rb.is_empty());
        assert_eq!((rb.head(), rb.tail()), (0, 0));
        rb.flush();
        assert!(rb.is_empty());
        assert_eq!(rb.available_space(), 7);
    }

    #[test]
    fn flush_leaves_bytes_in_place() {
        let mut backing = [0u8; 8];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"abc");
        rb.flush();
        assert_eq!(&rb.bytes()[..3], b"abc");
    }

    #[test]
    fn debug_shows_logical_content() {
        let mut backing = [0u8; 6];
        let mut rb = RingBuffer::from_slice(&mut backing).unwrap();
        rb.write(b"abcd");
        rb.discard(3);
        rb.write(b"ef");
        let rendered = std::format!("{rb:?}");
        assert_eq!(
            rendered,
            r#"RingBuffer { capacity: 6, head: 0, tail: 3, front: "def", back: "" }"#
        );
    }
}
