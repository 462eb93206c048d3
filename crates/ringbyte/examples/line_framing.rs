//! Frames newline-terminated commands out of a byte stream that arrives in
//! arbitrary chunks, the way a UART receive interrupt would deliver it.
//!
//! Run with `cargo run --example line_framing`.
#![allow(missing_docs)]

use ringbyte::{CreateError, RingBuffer, RingPool};

const CHUNKS: &[&[u8]] = &[
    b"SET led=1\nSE",
    b"T servo=9",
    b"0\nGET ",
    b"temp\nnoise-without-newline",
];

fn drain_lines(rx: &mut RingBuffer<'_>) {
    let mut line = [0u8; 32];
    loop {
        let n = rx.read_until(&mut line, b'\n');
        if n == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line[..n - 1]);
        println!("frame: {text:?}");
    }
}

fn main() -> Result<(), CreateError> {
    // Two channels drawn from a pool, no heap buffers involved.
    let pool: RingPool<2, 64> = RingPool::new();
    let mut rx = pool.create(64, None)?;
    let mut tx = pool.create(64, None)?;

    for chunk in CHUNKS {
        let stored = rx.write(chunk);
        if stored < chunk.len() {
            println!("rx overrun: dropped {} bytes", chunk.len() - stored);
        }
        drain_lines(&mut rx);
    }

    println!("pending without terminator: {rx:?}");
    println!("used {} of {} bytes", rx.used_space(), rx.capacity() - 1);

    tx.write(b"OK\n");
    let mut reply = [0u8; 8];
    let n = tx.read(&mut reply);
    println!("reply: {:?}", String::from_utf8_lossy(&reply[..n]));

    Ok(())
}
