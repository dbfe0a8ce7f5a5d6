//! Format-aware padding blocks.
//!
//! Each container format has some ancillary construct a reader must
//! skip: PNG `tEXt` chunks, JPEG comment segments, MP4 `free` atoms.
//! A [`ContainerPadder`] renders one such block at an exact byte size;
//! [`render_padding`] splits an arbitrary remainder into representable
//! blocks, taking care never to strand a tail smaller than the
//! format's minimum block.

use crate::domain::errors::GenError;

pub trait ContainerPadder {
    /// Smallest renderable block, total size including framing.
    fn min_block(&self) -> u64;
    /// Largest renderable block.
    fn max_block(&self) -> u64;
    /// Append one block of exactly `size` bytes to `out`.
    fn render_block(&self, size: u64, out: &mut Vec<u8>);
}

/// Split `needed` bytes of padding into valid blocks and render them.
pub fn render_padding(
    padder: &dyn ContainerPadder,
    mut needed: u64,
    out: &mut Vec<u8>,
) -> Result<(), GenError> {
    let min = padder.min_block();
    let max = padder.max_block();
    while needed > 0 {
        let mut block = needed.min(max);
        let tail = needed - block;
        if tail > 0 && tail < min {
            // Shrink this block so the tail stays renderable.
            block = needed - min;
        }
        if block < min {
            return Err(GenError::Encoding(format!(
                "cannot express {needed} padding bytes in blocks of {min}..={max}"
            )));
        }
        let before = out.len() as u64;
        padder.render_block(block, out);
        debug_assert_eq!(out.len() as u64 - before, block);
        needed -= block;
    }
    Ok(())
}

/// PNG `tEXt` chunk padding. A chunk is 4 length + 4 type + data +
/// 4 CRC; the data starts with the keyword `pad` and its NUL
/// separator, so the minimum block is 16 bytes.
pub struct PngTextPadder;

const PNG_CHUNK_OVERHEAD: u64 = 12;
const PNG_KEYWORD: &[u8] = b"pad\0";

impl ContainerPadder for PngTextPadder {
    fn min_block(&self) -> u64 {
        PNG_CHUNK_OVERHEAD + PNG_KEYWORD.len() as u64
    }

    fn max_block(&self) -> u64 {
        // Chunk data is a u32 length; stay far below it.
        PNG_CHUNK_OVERHEAD + 0x00FF_FFFF
    }

    fn render_block(&self, size: u64, out: &mut Vec<u8>) {
        let data_len = (size - PNG_CHUNK_OVERHEAD) as usize;
        let mut data = Vec::with_capacity(data_len);
        data.extend_from_slice(PNG_KEYWORD);
        data.resize(data_len, b'x');

        out.extend_from_slice(&(data_len as u32).to_be_bytes());
        out.extend_from_slice(b"tEXt");
        out.extend_from_slice(&data);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(b"tEXt");
        hasher.update(&data);
        out.extend_from_slice(&hasher.finalize().to_be_bytes());
    }
}

/// JPEG `COM` segment padding: marker, 2-byte length, then filler that
/// must avoid `0xFF` so no spurious marker appears.
pub struct JpegCommentPadder;

impl ContainerPadder for JpegCommentPadder {
    fn min_block(&self) -> u64 {
        // FF FE 00 02: an empty comment.
        4
    }

    fn max_block(&self) -> u64 {
        // Length field covers itself: 2 + 0xFFFF.
        2 + 0xFFFF
    }

    fn render_block(&self, size: u64, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0xFF, 0xFE]);
        out.extend_from_slice(&((size - 2) as u16).to_be_bytes());
        out.resize(out.len() + (size - 4) as usize, b' ');
    }
}

/// MP4 `free` atom padding: 4-byte big-endian size, `free`, zero fill.
pub struct FreeAtomPadder;

impl ContainerPadder for FreeAtomPadder {
    fn min_block(&self) -> u64 {
        8
    }

    fn max_block(&self) -> u64 {
        u32::MAX as u64
    }

    fn render_block(&self, size: u64, out: &mut Vec<u8>) {
        out.extend_from_slice(&(size as u32).to_be_bytes());
        out.extend_from_slice(b"free");
        out.resize(out.len() + (size - 8) as usize, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_chunk_is_exact_and_crc_checked() {
        let mut out = Vec::new();
        PngTextPadder.render_block(40, &mut out);
        assert_eq!(out.len(), 40);
        assert_eq!(&out[4..8], b"tEXt");
        let data_len = u32::from_be_bytes(out[0..4].try_into().unwrap()) as usize;
        assert_eq!(data_len, 40 - 12);
        let crc = u32::from_be_bytes(out[36..40].try_into().unwrap());
        assert_eq!(crc, crc32fast::hash(&out[4..36]));
    }

    #[test]
    fn jpeg_comment_has_no_stray_marker_bytes() {
        let mut out = Vec::new();
        JpegCommentPadder.render_block(100, &mut out);
        assert_eq!(out.len(), 100);
        assert!(!out[2..].contains(&0xFF));
    }

    #[test]
    fn free_atom_declares_its_own_size() {
        let mut out = Vec::new();
        FreeAtomPadder.render_block(64, &mut out);
        assert_eq!(out.len(), 64);
        assert_eq!(u32::from_be_bytes(out[0..4].try_into().unwrap()), 64);
        assert_eq!(&out[4..8], b"free");
    }

    #[test]
    fn splitting_never_strands_a_small_tail() {
        // max 20, min 8: 25 must not split as 20 + 5.
        struct Tiny;
        impl ContainerPadder for Tiny {
            fn min_block(&self) -> u64 {
                8
            }
            fn max_block(&self) -> u64 {
                20
            }
            fn render_block(&self, size: u64, out: &mut Vec<u8>) {
                out.resize(out.len() + size as usize, 0xAA);
            }
        }
        let mut out = Vec::new();
        render_padding(&Tiny, 25, &mut out).unwrap();
        assert_eq!(out.len(), 25);
    }

    #[test]
    fn unrepresentable_remainder_is_an_error() {
        let mut out = Vec::new();
        assert!(render_padding(&JpegCommentPadder, 3, &mut out).is_err());
    }
}
