// SPDX-License-Identifier: MIT
//! Bit-granular output buffer.
//!
//! Object records mix bit-packed fields with byte-aligned runs, so the
//! writer tracks a bit cursor into the last buffer byte. The cursor
//! invariant lives entirely inside this type: `write_bits` packs
//! MSB-first into the free bits of the current byte, `byte_align`
//! zero-pads to the next boundary, and everything byte-oriented goes
//! through `push_byte`/`extend_from_slice` at a boundary.

/// Append-only byte buffer with a bit cursor in `[0, 8)`.
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    cursor: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Pack the low `n` bits of `value`, most-significant-bit first,
    /// into the remaining free bits of the current byte, spilling into
    /// newly appended zero bytes as needed.
    pub fn write_bits(&mut self, value: u64, n: u8) {
        debug_assert!(n <= 64, "at most 64 bits per call");
        let mut remaining = n;
        while remaining > 0 {
            if self.cursor == 0 {
                self.buf.push(0);
            }
            let free = 8 - self.cursor;
            let take = remaining.min(free);
            let mask = if take == 64 { u64::MAX } else { (1u64 << take) - 1 };
            let chunk = ((value >> (remaining - take)) & mask) as u8;
            let last = self.buf.len() - 1;
            self.buf[last] |= chunk << (free - take);
            self.cursor = (self.cursor + take) % 8;
            remaining -= take;
        }
    }

    /// Zero-pad the remaining bits of the current byte and reset the
    /// cursor to a byte boundary. The padding bits are already zero
    /// because bytes are appended zeroed.
    pub fn byte_align(&mut self) {
        self.cursor = 0;
    }

    /// Append a raw byte. Forces alignment first.
    pub fn push_byte(&mut self, byte: u8) {
        self.byte_align();
        self.buf.push(byte);
    }

    /// Append raw bytes. Forces alignment first.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.byte_align();
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes emitted so far, counting a partially filled final byte.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bit position within the current byte.
    pub fn bit_position(&self) -> u8 {
        self.cursor
    }

    /// Consume the writer, yielding the buffer. A trailing partial
    /// byte keeps its zero padding.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
