//! C ABI over [`ringbyte::RingBuffer`].
//!
//! The functions mirror a classic C ring buffer interface: sizes are `u32`,
//! booleans are non-zero `u32`, `ringbyte_search` returns `-1` when nothing
//! matches, and null pointers select alternative modes instead of being
//! errors:
//!
//! - `ringbyte_create(NULL, n)` allocates the backing array; a non-null buffer
//!   is borrowed and must outlive the handle.
//! - `ringbyte_write(rb, NULL, n)` appends `n` zero bytes.
//! - `ringbyte_read(rb, NULL, n)` drops up to `n` bytes.
//! - `ringbyte_read_until(rb, NULL, _, token)` drops through the first
//!   `token`, ignoring the size argument.
//! - `ringbyte_search(rb, NULL, _)` returns `-1`.
//!
//! A null handle makes every call a no-op returning zero.

use core::{ffi::c_char, ptr, slice};

use ringbyte::RingBuffer;

/// Opaque ring buffer handle handed to C callers.
pub struct RingHandle {
    ring: RingBuffer<'static>,
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// # Safety
///
/// `rb` must be null or a live pointer returned by [`ringbyte_create`].
unsafe fn ring<'h>(rb: *mut RingHandle) -> Option<&'h mut RingBuffer<'static>> {
    // SAFETY: guaranteed by the caller.
    let handle = unsafe { rb.as_mut() };
    handle.map(|handle| &mut handle.ring)
}

/// Creates a ring buffer of `buffer_size` bytes.
///
/// When `buffer` is null the backing array is allocated and freed with the
/// handle; otherwise `buffer` is used in place and never freed. Returns null
/// when `buffer_size` is zero or allocation fails.
///
/// # Safety
///
/// A non-null `buffer` must be valid for reads and writes of `buffer_size`
/// bytes until [`ringbyte_destroy`] is called, and must not be accessed
/// through other pointers in the meantime.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_create(buffer: *mut u8, buffer_size: u32) -> *mut RingHandle {
    let capacity = buffer_size as usize;
    let created = if buffer.is_null() {
        RingBuffer::with_buffer(capacity, None)
    } else {
        // SAFETY: the caller lends `buffer_size` bytes for the handle's
        // lifetime.
        let bytes = unsafe { slice::from_raw_parts_mut(buffer, capacity) };
        RingBuffer::from_slice(bytes)
    };
    match created {
        Ok(ring) => Box::into_raw(Box::new(RingHandle { ring })),
        Err(err) => {
            log::debug!("ringbyte_create returning null: {err}");
            ptr::null_mut()
        }
    }
}

/// Destroys a handle. Null is accepted and ignored.
///
/// # Safety
///
/// `rb` must be null or a pointer from [`ringbyte_create`] that has not been
/// destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_destroy(rb: *mut RingHandle) {
    if rb.is_null() {
        return;
    }
    // SAFETY: `rb` came from `Box::into_raw` in `ringbyte_create`.
    drop(unsafe { Box::from_raw(rb) });
}

/// Writes up to `data_size` bytes from `data`, or zero bytes when `data` is
/// null. Returns the number of bytes written.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`]; a non-null `data` must be valid for
/// reads of `data_size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_write(
    rb: *mut RingHandle,
    data: *const u8,
    data_size: u32,
) -> u32 {
    // SAFETY: guaranteed by the caller.
    let Some(ring) = (unsafe { ring(rb) }) else {
        return 0;
    };
    let written = if data.is_null() {
        ring.write_zeroes(data_size as usize)
    } else {
        // SAFETY: guaranteed by the caller.
        ring.write(unsafe { slice::from_raw_parts(data, data_size as usize) })
    };
    to_u32(written)
}

/// Reads up to `size` bytes into `buffer`, or drops them when `buffer` is
/// null. Returns the number of bytes read.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`]; a non-null `buffer` must be valid for
/// writes of `size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_read(rb: *mut RingHandle, buffer: *mut u8, size: u32) -> u32 {
    // SAFETY: guaranteed by the caller.
    let Some(ring) = (unsafe { ring(rb) }) else {
        return 0;
    };
    let read = if buffer.is_null() {
        ring.discard(size as usize)
    } else {
        // SAFETY: guaranteed by the caller.
        ring.read(unsafe { slice::from_raw_parts_mut(buffer, size as usize) })
    };
    to_u32(read)
}

/// Reads through the first `token` into `buffer` (at most `buffer_size`
/// bytes), or drops through it when `buffer` is null. Reads nothing when the
/// token is absent. Returns the number of bytes read, the token included.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`]; a non-null `buffer` must be valid for
/// writes of `buffer_size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_read_until(
    rb: *mut RingHandle,
    buffer: *mut u8,
    buffer_size: u32,
    token: u8,
) -> u32 {
    // SAFETY: guaranteed by the caller.
    let Some(ring) = (unsafe { ring(rb) }) else {
        return 0;
    };
    let read = if buffer.is_null() {
        ring.discard_until(token)
    } else {
        // SAFETY: guaranteed by the caller.
        let output = unsafe { slice::from_raw_parts_mut(buffer, buffer_size as usize) };
        ring.read_until(output, token)
    };
    to_u32(read)
}

/// Empties the ring.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_flush(rb: *mut RingHandle) {
    // SAFETY: guaranteed by the caller.
    if let Some(ring) = unsafe { ring(rb) } {
        ring.flush();
    }
}

/// Number of unread bytes.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_used_space(rb: *mut RingHandle) -> u32 {
    // SAFETY: guaranteed by the caller.
    let ring = unsafe { ring(rb) };
    ring.map_or(0, |ring| to_u32(ring.used_space()))
}

/// Number of bytes that can still be written.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_available_space(rb: *mut RingHandle) -> u32 {
    // SAFETY: guaranteed by the caller.
    let ring = unsafe { ring(rb) };
    ring.map_or(0, |ring| to_u32(ring.available_space()))
}

/// Non-zero when the ring is full.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_is_full(rb: *mut RingHandle) -> u32 {
    // SAFETY: guaranteed by the caller.
    let ring = unsafe { ring(rb) };
    ring.map_or(0, |ring| u32::from(ring.is_full()))
}

/// Non-zero when the ring is empty.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_is_empty(rb: *mut RingHandle) -> u32 {
    // SAFETY: guaranteed by the caller.
    let ring = unsafe { ring(rb) };
    ring.map_or(0, |ring| u32::from(ring.is_empty()))
}

/// Number of unread bytes equal to `byte`.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_count(rb: *mut RingHandle, byte: u8) -> u32 {
    // SAFETY: guaranteed by the caller.
    let ring = unsafe { ring(rb) };
    ring.map_or(0, |ring| to_u32(ring.count(byte)))
}

/// Copies up to `peek_size` unread bytes into `buffer` without consuming
/// them.
///
/// The destination size is not checked: the caller guarantees room for
/// `peek_size` bytes. Fewer bytes are copied when the ring holds less.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`]; `buffer` must be valid for writes of
/// `peek_size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_peek(rb: *mut RingHandle, buffer: *mut u8, peek_size: u32) {
    // SAFETY: guaranteed by the caller.
    let Some(ring) = (unsafe { ring(rb) }) else {
        return;
    };
    if buffer.is_null() {
        return;
    }
    // SAFETY: guaranteed by the caller.
    let output = unsafe { slice::from_raw_parts_mut(buffer, peek_size as usize) };
    ring.peek(output);
}

/// Offset of the first occurrence of the `size`-byte sequence `to_search`,
/// counted from the oldest unread byte, or `-1` when it does not occur, the
/// pattern is null or empty, or the offset does not fit an `i32`.
///
/// # Safety
///
/// `rb` as for [`ringbyte_destroy`]; a non-null `to_search` must be valid for
/// reads of `size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ringbyte_search(
    rb: *mut RingHandle,
    to_search: *const u8,
    size: u32,
) -> i32 {
    // SAFETY: guaranteed by the caller.
    let Some(ring) = (unsafe { ring(rb) }) else {
        return -1;
    };
    if to_search.is_null() {
        return -1;
    }
    // SAFETY: guaranteed by the caller.
    let pattern = unsafe { slice::from_raw_parts(to_search, size as usize) };
    ring.search(pattern)
        .and_then(|offset| i32::try_from(offset).ok())
        .unwrap_or(-1)
}

/// Library version as a NUL-terminated string with static lifetime.
#[unsafe(no_mangle)]
pub extern "C" fn ringbyte_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr().cast()
}
