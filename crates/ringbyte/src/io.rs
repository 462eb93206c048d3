//! `std::io` adapters.
//!
//! `Write::write` stores what fits and returns `Ok(0)` on a full ring, which
//! `write_all` turns into `ErrorKind::WriteZero`. `Read::read` returns `Ok(0)`
//! on an empty ring. `Write::flush` has nothing to push downstream and does
//! not discard data; use [`RingBuffer::flush`] for that.

use std::io;

use crate::RingBuffer;

impl io::Write for RingBuffer<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RingBuffer::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for RingBuffer<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(RingBuffer::read(self, buf))
    }
}
