//! Non-destructive inspection of the logical content.
//!
//! Nothing here moves `head` or `tail`. Offsets are measured from `tail`, so
//! offset 0 is the next byte `read` would return.

use core::{iter::Chain, slice};

use crate::RingBuffer;

impl RingBuffer<'_> {
    /// Returns the unread bytes as up to two slices in logical order.
    ///
    /// The second slice is non-empty only when the content wraps past the end
    /// of the backing array.
    #[must_use]
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        let (head, tail) = (self.head(), self.tail());
        let bytes = self.bytes();
        if tail <= head {
            (&bytes[tail..head], &[])
        } else {
            (&bytes[tail..], &bytes[..head])
        }
    }

    /// Iterates over the unread bytes, oldest first.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        let (front, back) = self.as_slices();
        Iter {
            inner: front.iter().chain(back),
        }
    }

    /// Counts the occurrences of `byte` among the unread bytes.
    #[must_use]
    pub fn count(&self, byte: u8) -> usize {
        let (front, back) = self.as_slices();
        front.iter().chain(back).filter(|&&b| b == byte).count()
    }

    /// Copies unread bytes into `output` without consuming them.
    ///
    /// Copies `min(output.len(), used_space())` bytes and returns that count.
    pub fn peek(&self, output: &mut [u8]) -> usize {
        let n = output.len().min(self.used_space());
        let (front, back) = self.spans(self.tail(), n);
        let split = front.len();
        let bytes = self.bytes();
        output[..split].copy_from_slice(&bytes[front]);
        output[split..n].copy_from_slice(&bytes[back]);
        n
    }

    /// Finds the first occurrence of `pattern` among the unread bytes.
    ///
    /// Returns the number of bytes preceding the match, or `None` when the
    /// pattern does not occur or is empty.
    ///
    /// This is a plain sliding comparison: on a mismatch the scan resumes at
    /// the byte after the candidate start, so overlapping candidates are never
    /// skipped. Worst case is `O(used_space() * pattern.len())`.
    #[must_use]
    pub fn search(&self, pattern: &[u8]) -> Option<usize> {
        let (&first, rest) = pattern.split_first()?;
        let used = self.used_space();

        for start in 0..used {
            if self.byte_at(start) != first {
                continue;
            }
            if rest.is_empty() {
                return Some(start);
            }
            // The candidate runs into `head`; later candidates cannot fit
            // either.
            if start + pattern.len() > used {
                return None;
            }
            let matched = rest
                .iter()
                .enumerate()
                .all(|(i, &expected)| self.byte_at(start + 1 + i) == expected);
            if matched {
                return Some(start);
            }
        }
        None
    }

    /// Byte at logical `offset` from `tail`. `offset` must be below
    /// `used_space()`.
    fn byte_at(&self, offset: usize) -> u8 {
        self.bytes()[self.wrap(self.tail() + offset)]
    }
}

/// Iterator over the unread bytes of a [`RingBuffer`], oldest first.
///
/// Created by [`RingBuffer::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'r> {
    inner: Chain<slice::Iter<'r, u8>, slice::Iter<'r, u8>>,
}

impl Iterator for Iter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<u8> {
        self.inner.next_back().copied()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'r> IntoIterator for &'r RingBuffer<'_> {
    type Item = u8;
    type IntoIter = Iter<'r>;

    fn into_iter(self) -> Iter<'r> {
        self.iter()
    }
}
