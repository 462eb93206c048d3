#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ringbyte::RingBuffer;

#[derive(Debug, Arbitrary)]
enum Op {
    Write(Vec<u8>),
    WriteZeroes(u8),
    Read(u8),
    Discard(u8),
    ReadUntil { limit: u8, token: u8 },
    DiscardUntil(u8),
    Peek(u8),
    Count(u8),
    Search(Vec<u8>),
    Flush,
}

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    ops: Vec<Op>,
}

/// Slice-window search used as the oracle for `RingBuffer::search`.
fn reference_search(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn run(input: Input) {
    let capacity = usize::from(input.capacity).max(1);
    let mut rb = RingBuffer::new(capacity).expect("small heap ring");
    let mut model: VecDeque<u8> = VecDeque::new();

    for op in input.ops {
        let available = capacity - 1 - model.len();
        match op {
            Op::Write(bytes) => {
                let n = rb.write(&bytes);
                assert_eq!(n, bytes.len().min(available));
                model.extend(&bytes[..n]);
            }
            Op::WriteZeroes(count) => {
                let n = rb.write_zeroes(usize::from(count));
                assert_eq!(n, usize::from(count).min(available));
                model.extend(std::iter::repeat_n(0, n));
            }
            Op::Read(limit) => {
                let mut out = vec![0; usize::from(limit)];
                let n = rb.read(&mut out);
                let expected: Vec<u8> = model.drain(..n.min(model.len())).collect();
                assert_eq!(&out[..n], &expected[..]);
            }
            Op::Discard(limit) => {
                let n = rb.discard(usize::from(limit));
                assert_eq!(n, usize::from(limit).min(model.len()));
                model.drain(..n);
            }
            Op::ReadUntil { limit, token } => {
                let mut out = vec![0; usize::from(limit)];
                let n = rb.read_until(&mut out, token);
                let expected = match model.iter().position(|&b| b == token) {
                    Some(position) => usize::from(limit).min(position + 1),
                    None => 0,
                };
                assert_eq!(n, expected);
                let drained: Vec<u8> = model.drain(..n).collect();
                assert_eq!(&out[..n], &drained[..]);
            }
            Op::DiscardUntil(token) => {
                let n = rb.discard_until(token);
                let expected = model.iter().position(|&b| b == token).map_or(0, |p| p + 1);
                assert_eq!(n, expected);
                model.drain(..n);
            }
            Op::Peek(limit) => {
                let mut out = vec![0; usize::from(limit)];
                let n = rb.peek(&mut out);
                assert_eq!(n, usize::from(limit).min(model.len()));
                assert!(out[..n].iter().eq(model.iter().take(n)));
            }
            Op::Count(byte) => {
                assert_eq!(rb.count(byte), model.iter().filter(|&&b| b == byte).count());
            }
            Op::Search(pattern) => {
                let haystack: Vec<u8> = model.iter().copied().collect();
                assert_eq!(rb.search(&pattern), reference_search(&haystack, &pattern));
            }
            Op::Flush => {
                rb.flush();
                model.clear();
            }
        }

        rb.assert_consistent();
        assert_eq!(rb.used_space(), model.len());
        assert!(rb.iter().eq(model.iter().copied()));
    }
}

fuzz_target!(|input: Input| run(input));
