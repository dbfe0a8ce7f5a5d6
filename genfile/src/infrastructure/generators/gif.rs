//! GIF generator.
//!
//! The image is 4-color noise coded with the "uncompressed LZW" trick:
//! a clear code before every pixel keeps the code width at three bits,
//! making the data stream length a pure function of the pixel count.
//! Remainders become a comment extension; the 1-, 2- and 4-byte
//! residues a comment cannot express are soaked up by stuffing extra
//! clear codes (legal no-ops) into the LZW stream.

use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;
use crate::engine::cost_model::CostModel;
use crate::engine::planner::plan_unit_count;

pub struct GifGenerator;

const WIDTH: u64 = 32;
/// Header, logical screen descriptor, 4-entry color table, image
/// descriptor, LZW minimum code size byte, trailer.
const FIXED_OVERHEAD: u64 = 6 + 7 + 12 + 10 + 1 + 1;

const CODE_BITS: u64 = 3;
const CLEAR: u8 = 4;
const END_OF_INFO: u8 = 5;

/// Packed LZW byte count for `npix` pixels and `stuffed` extra clears.
fn lzw_bytes(npix: u64, stuffed: u64) -> u64 {
    let codes = 2 * npix + stuffed + 2;
    (codes * CODE_BITS + 7) / 8
}

/// Sub-block framing: one length byte per 255-byte run plus the block
/// terminator.
fn framed(data: u64) -> u64 {
    data + data.div_ceil(255) + 1
}

fn total_size(npix: u64, stuffed: u64) -> u64 {
    FIXED_OVERHEAD + framed(lzw_bytes(npix, stuffed))
}

/// Comment extension sizes are 3 (empty) or anything from 5 up.
fn comment_expressible(size: u64) -> bool {
    size == 0 || size == 3 || size >= 5
}

fn append_comment(out: &mut Vec<u8>, size: u64) {
    if size == 0 {
        return;
    }
    out.extend_from_slice(&[0x21, 0xFE]);
    let mut rem = size - 3;
    while rem > 0 {
        let mut chunk = rem.min(256);
        if rem - chunk == 1 {
            chunk -= 1;
        }
        out.push((chunk - 1) as u8);
        out.resize(out.len() + (chunk - 1) as usize, b' ');
        rem -= chunk;
    }
    out.push(0x00);
}

fn pack_codes(codes: impl Iterator<Item = u8>) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc = 0u32;
    let mut nbits = 0u32;
    for code in codes {
        acc |= (code as u32) << nbits;
        nbits += CODE_BITS as u32;
        while nbits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            nbits -= 8;
        }
    }
    if nbits > 0 {
        out.push(acc as u8);
    }
    out
}

fn render(height: u64, noise: &[u8], stuffed: u64, comment: u64) -> Vec<u8> {
    let npix = WIDTH * height;
    let mut out = Vec::new();

    out.extend_from_slice(b"GIF89a");
    out.extend_from_slice(&(WIDTH as u16).to_le_bytes());
    out.extend_from_slice(&(height as u16).to_le_bytes());
    // Global color table present, 4 entries.
    out.extend_from_slice(&[0x91, 0x00, 0x00]);
    for level in [0x00u8, 0x55, 0xAA, 0xFF] {
        out.extend_from_slice(&[level; 3]);
    }

    // Image descriptor at origin, no local color table.
    out.push(0x2C);
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(WIDTH as u16).to_le_bytes());
    out.extend_from_slice(&(height as u16).to_le_bytes());
    out.push(0x00);

    out.push(2); // LZW minimum code size

    let pixels = noise[..npix as usize].iter().map(|p| p & 0b11);
    let codes = std::iter::once(CLEAR)
        .chain(pixels.flat_map(|p| [p, CLEAR]))
        .chain(std::iter::repeat(CLEAR).take(stuffed as usize))
        .chain(std::iter::once(END_OF_INFO));
    let data = pack_codes(codes);
    for block in data.chunks(255) {
        out.push(block.len() as u8);
        out.extend_from_slice(block);
    }
    out.push(0x00);

    append_comment(&mut out, comment);
    out.push(0x3B); // trailer
    out
}

impl FileGenerator for GifGenerator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        // Height = units + 1, clamped to the u16 dimension field; the
        // comment extension carries whatever the image cannot.
        let clamp = |units: u64| units.min(u16::MAX as u64 - 1);
        let measure = move |units: u64| Ok(total_size(WIDTH * (clamp(units) + 1), 0));
        let model = CostModel::probe(measure, 4)?;
        let plan = plan_unit_count(target_bytes, &model, 0, measure)?;

        let height = clamp(plan.units) + 1;
        let npix = WIDTH * height;

        // Find a stuffing count whose growth leaves a remainder the
        // comment extension can express.
        let base = total_size(npix, 0);
        let mut choice = None;
        for stuffed in 0..=(8 * plan.padding_needed / CODE_BITS + 16) {
            let growth = total_size(npix, stuffed) - base;
            if growth > plan.padding_needed {
                break;
            }
            let comment = plan.padding_needed - growth;
            if comment_expressible(comment) {
                choice = Some((stuffed, comment));
                break;
            }
        }
        let (stuffed, comment) = choice.ok_or_else(|| {
            GenError::Encoding(format!(
                "no stuffing/comment split for remainder {}",
                plan.padding_needed
            ))
        })?;

        let mut noise = vec![0u8; npix as usize];
        rng.fill_bytes(&mut noise);
        let out = render(height, &noise, stuffed, comment);
        debug_assert_eq!(out.len() as u64, target_bytes);
        Ok(out)
    }
}
