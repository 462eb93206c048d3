#![allow(missing_docs)]
use insta::assert_snapshot;
use ringbyte::RingBuffer;

const PHRASE: &[u8] = b"hello dear world";

fn check_phrase(rb: &mut RingBuffer<'_>) {
    rb.write(PHRASE);

    // full, empty
    assert!(rb.is_full());
    assert!(!rb.is_empty());

    // used, available
    assert_eq!(rb.used_space(), PHRASE.len());
    assert_eq!(rb.available_space(), 0);

    // count
    assert_eq!(rb.count(b'l'), 3);
    assert_eq!(rb.count(b'x'), 0);

    // peek
    let mut buffer = [0u8; 16];
    assert_eq!(rb.peek(&mut buffer[..5]), 5);
    assert_eq!(&buffer[..5], b"hello");
    assert_eq!(buffer[5], 0);
    assert_eq!(rb.used_space(), PHRASE.len());

    // search
    assert_eq!(rb.search(b"dear"), Some(6));
    assert_eq!(rb.search(b"sad"), None);

    // full, empty
    rb.flush();
    assert!(!rb.is_full());
    assert!(rb.is_empty());
}

#[test]
fn info_on_heap_ring() {
    let mut rb = RingBuffer::new(17).unwrap();
    check_phrase(&mut rb);
}

#[test]
fn info_on_borrowed_ring() {
    let mut user_buffer = [0u8; 17];
    let mut rb = RingBuffer::from_slice(&mut user_buffer).unwrap();
    check_phrase(&mut rb);
    drop(rb);
    // the caller keeps its array, and flush did not erase it
    assert_eq!(&user_buffer[..16], PHRASE);
}

#[test]
fn debug_rendering() {
    let mut rb = RingBuffer::new(8).unwrap();
    rb.write(b"ab\ncd");
    rb.discard(1);
    assert_snapshot!(format!("{rb:?}"), @r#"RingBuffer { capacity: 8, head: 5, tail: 1, front: "b\ncd", back: "" }"#);
}
