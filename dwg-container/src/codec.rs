// SPDX-License-Identifier: MIT
//! Variable-width value encodings used inside object records.
//!
//! Small integers and doubles are stored behind a 2-bit selector so
//! that the common values (0, 1.0, one-byte counts) cost a couple of
//! bits instead of a full field. Handle references are byte-aligned:
//! a length byte followed by the handle's little-endian value bytes.

use crate::bits::BitWriter;

/// Selector values shared by the integer and double encodings.
const TAG_FULL: u64 = 0b00;
const TAG_BYTE: u64 = 0b01;
const TAG_ZERO: u64 = 0b10;
const TAG_SPECIAL: u64 = 0b11;

/// Encode a short integer: `10` = 0, `11` = 256, `01` + 8 bits for one
/// raw byte, `00` + 16 bits little-endian otherwise.
pub fn write_bit_short(w: &mut BitWriter, value: i32) {
    match value {
        0 => w.write_bits(TAG_ZERO, 2),
        256 => w.write_bits(TAG_SPECIAL, 2),
        1..=255 => {
            w.write_bits(TAG_BYTE, 2);
            w.write_bits(value as u64, 8);
        }
        _ => {
            w.write_bits(TAG_FULL, 2);
            let v = value as u16;
            w.write_bits((v & 0xFF) as u64, 8);
            w.write_bits((v >> 8) as u64, 8);
        }
    }
}

/// Encode a short integer in the full 16-bit form regardless of value.
///
/// Used for the one field that is patched in place after the fact (the
/// owned-object count): the wide form keeps the record length stable
/// no matter what count is written later.
pub fn write_bit_short_full(w: &mut BitWriter, value: u16) {
    w.write_bits(TAG_FULL, 2);
    w.write_bits((value & 0xFF) as u64, 8);
    w.write_bits((value >> 8) as u64, 8);
}

/// Encode a double: `10` = 0.0, `11` = 1.0, `00` + the full IEEE-754
/// value byte by byte, little-endian.
pub fn write_bit_double(w: &mut BitWriter, value: f64) {
    if value == 0.0 {
        w.write_bits(TAG_ZERO, 2);
    } else if value == 1.0 {
        w.write_bits(TAG_SPECIAL, 2);
    } else {
        w.write_bits(TAG_FULL, 2);
        for byte in value.to_le_bytes() {
            w.write_bits(byte as u64, 8);
        }
    }
}

/// Encode a handle reference at a byte boundary: a null handle is one
/// zero byte, otherwise a length byte followed by that many
/// little-endian value bytes.
pub fn write_handle_ref(w: &mut BitWriter, handle: u32) {
    w.byte_align();
    if handle == 0 {
        w.push_byte(0);
        return;
    }
    let bytes = handle_bytes(handle);
    w.push_byte(bytes.len() as u8);
    w.extend_from_slice(&bytes);
}

/// Little-endian value bytes of a non-zero handle, shortest form.
pub fn handle_bytes(handle: u32) -> Vec<u8> {
    let mut value = handle;
    let mut bytes = Vec::with_capacity(4);
    while value > 0 {
        bytes.push((value & 0xFF) as u8);
        value >>= 8;
    }
    if bytes.is_empty() {
        bytes.push(0);
    }
    bytes
}

/// Encode a length-prefixed byte string (object names, descriptions).
pub fn write_text(w: &mut BitWriter, text: &str) {
    w.byte_align();
    debug_assert!(text.len() <= u8::MAX as usize);
    w.push_byte(text.len() as u8);
    w.extend_from_slice(text.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(f: impl FnOnce(&mut BitWriter)) -> Vec<u8> {
        let mut w = BitWriter::new();
        f(&mut w);
        w.finish()
    }

    #[test]
    fn bit_short_sentinels() {
        assert_eq!(bits_of(|w| write_bit_short(w, 0)), vec![0b1000_0000]);
        assert_eq!(bits_of(|w| write_bit_short(w, 256)), vec![0b1100_0000]);
    }

    #[test]
    fn bit_short_one_byte_form() {
        // 01 selector then 0x30 -> 0100_1100 00xx_xxxx
        assert_eq!(
            bits_of(|w| write_bit_short(w, 0x30)),
            vec![0b0100_1100, 0b0000_0000]
        );
    }

    #[test]
    fn bit_short_full_form_is_fixed_width() {
        let zero = bits_of(|w| {
            write_bit_short_full(w, 0);
            w.byte_align();
        });
        let big = bits_of(|w| {
            write_bit_short_full(w, 40_000);
            w.byte_align();
        });
        assert_eq!(zero.len(), big.len());
        assert_eq!(zero.len(), 3); // 2 + 16 bits, zero padded
    }

    #[test]
    fn bit_double_specials() {
        assert_eq!(bits_of(|w| write_bit_double(w, 0.0)), vec![0b1000_0000]);
        assert_eq!(bits_of(|w| write_bit_double(w, 1.0)), vec![0b1100_0000]);
    }

    #[test]
    fn bit_double_full_is_ten_bits_plus_payload() {
        let out = bits_of(|w| {
            write_bit_double(w, 2.5);
            w.byte_align();
        });
        // 2 selector bits + 64 value bits = 66 bits -> 9 bytes aligned.
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn null_handle_is_single_zero_byte() {
        assert_eq!(bits_of(|w| write_handle_ref(w, 0)), vec![0x00]);
    }

    #[test]
    fn handle_ref_is_length_prefixed_le() {
        assert_eq!(
            bits_of(|w| write_handle_ref(w, 0x0102)),
            vec![2, 0x02, 0x01]
        );
    }

    #[test]
    fn handle_ref_aligns_first() {
        let out = bits_of(|w| {
            w.write_bits(0b1, 1);
            write_handle_ref(w, 4);
        });
        assert_eq!(out, vec![0b1000_0000, 1, 4]);
    }
}
