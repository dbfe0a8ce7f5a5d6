//! JPEG generator.
//!
//! A fixed 1x1 grayscale baseline skeleton carries the image; comment
//! (`COM`) segments placed after APP0 absorb the remainder. The
//! skeleton always includes one comment segment, so the comment run
//! can be resized to any remainder without leaving an inexpressible
//! 1-3 byte gap.

use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;
use crate::engine::padding::{render_padding, ContainerPadder, JpegCommentPadder};

pub struct JpegGenerator;

/// SOI plus the JFIF APP0 segment.
const HEAD: &[u8] = &[
    0xFF, 0xD8, // SOI
    0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00,
    0x01, 0x00, 0x00,
];

/// Everything after the comment run: quantization table, frame and
/// scan headers, entropy data, EOI.
fn tail() -> Vec<u8> {
    let mut out = Vec::new();

    // DQT: table 0, all sixteens.
    out.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    out.extend_from_slice(&[0x10; 64]);

    // SOF0: 8-bit precision, 1x1, one component, table 0.
    out.extend_from_slice(&[
        0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00,
    ]);

    // DC and AC Huffman tables, each a single one-bit code for
    // symbol 0 (DC category zero / AC end-of-block).
    for class in [0x00u8, 0x10] {
        out.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, class, 0x01]);
        out.extend_from_slice(&[0x00; 15]);
        out.push(0x00);
    }

    // SOS for component 1, then the entropy-coded scan: DC code `0`,
    // EOB `0`, padded with ones.
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    out.push(0x3F);

    out.extend_from_slice(&[0xFF, 0xD9]); // EOI
    out
}

impl FileGenerator for JpegGenerator {
    fn generate(&self, target_bytes: u64, _rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        let padder = JpegCommentPadder;
        let tail = tail();
        let minimum = HEAD.len() as u64 + padder.min_block() + tail.len() as u64;
        if target_bytes < minimum {
            return Err(GenError::SizeTooSmall {
                target: target_bytes,
                minimum,
            });
        }

        let comment_run = target_bytes - HEAD.len() as u64 - tail.len() as u64;
        let mut out = Vec::with_capacity(target_bytes as usize);
        out.extend_from_slice(HEAD);
        render_padding(&padder, comment_run, &mut out)?;
        out.extend_from_slice(&tail);
        debug_assert_eq!(out.len() as u64, target_bytes);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(target: u64) -> Vec<u8> {
        let mut rng = rand::rng();
        JpegGenerator.generate(target, &mut rng).unwrap()
    }

    fn minimum() -> u64 {
        HEAD.len() as u64 + 4 + tail().len() as u64
    }

    #[test]
    fn exact_at_every_small_offset_from_minimum() {
        for extra in 0..16u64 {
            let target = minimum() + extra;
            assert_eq!(run(target).len() as u64, target, "target {target}");
        }
    }

    #[test]
    fn starts_with_soi_ends_with_eoi() {
        let bytes = run(4096);
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn comment_run_spans_segment_boundary() {
        // Larger than one COM segment's capacity.
        let target = minimum() + 70_000;
        let bytes = run(target);
        assert_eq!(bytes.len() as u64, target);
        let count = bytes
            .windows(2)
            .filter(|w| w[0] == 0xFF && w[1] == 0xFE)
            .count();
        assert!(count >= 2, "expected a split comment run, got {count}");
    }

    #[test]
    fn below_minimum_is_rejected() {
        let mut rng = rand::rng();
        assert!(matches!(
            JpegGenerator.generate(20, &mut rng),
            Err(GenError::SizeTooSmall { .. })
        ));
    }
}
