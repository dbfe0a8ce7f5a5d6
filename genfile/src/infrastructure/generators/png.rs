//! PNG generator.
//!
//! The image is 8-bit grayscale noise compressed with stored deflate
//! blocks, so its encoded size is a deterministic function of the
//! dimensions. Width is fixed from the byte budget; the planner picks
//! the row count, and `tEXt` chunks absorb the remainder ahead of
//! `IEND`.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;
use crate::engine::cost_model::CostModel;
use crate::engine::padding::{render_padding, ContainerPadder, PngTextPadder};
use crate::engine::planner::plan_unit_count;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const MAX_WIDTH: u64 = 4096;

pub struct PngGenerator;

fn append_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Render the image with `height` noise rows, without padding chunks
/// or the IEND trailer.
fn render_body(width: u64, height: u64, noise: &[u8]) -> Result<Vec<u8>, GenError> {
    let w = width as usize;
    let mut raw = Vec::with_capacity((w + 1) * height as usize);
    for row in 0..height as usize {
        // Filter type 0 (none) per scanline.
        raw.push(0);
        raw.extend_from_slice(&noise[row * w..row * w + w]);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::none());
    encoder.write_all(&raw)?;
    let idat = encoder.finish()?;

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    // 8-bit grayscale, no interlace.
    ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);

    let mut out = Vec::new();
    out.extend_from_slice(&PNG_SIGNATURE);
    append_chunk(&mut out, b"IHDR", &ihdr);
    append_chunk(&mut out, b"IDAT", &idat);
    Ok(out)
}

/// IEND is an empty chunk: 12 bytes.
const IEND_SIZE: u64 = 12;

impl FileGenerator for PngGenerator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        // Bytes track pixels closely for stored grayscale, so the
        // width comes straight from the square root of the budget.
        let width = (target_bytes as f64).sqrt().floor().clamp(1.0, MAX_WIDTH as f64) as u64;

        // Enough noise for any height the planner might choose, with
        // headroom for the model's estimation error.
        let max_height = target_bytes / (width + 1) + 8;
        let mut noise = vec![0u8; (width * max_height) as usize];
        rng.fill_bytes(&mut noise);

        // Height = units + 1: a zero-row image is not a valid PNG.
        let measure = |units: u64| -> Result<u64, GenError> {
            Ok(render_body(width, units + 1, &noise)?.len() as u64 + IEND_SIZE)
        };

        let model = CostModel::probe(measure, 4)?;
        let padder = PngTextPadder;
        let plan = plan_unit_count(target_bytes, &model, padder.min_block(), measure)?;

        let mut out = render_body(width, plan.units + 1, &noise)?;
        render_padding(&padder, plan.padding_needed, &mut out)?;
        append_chunk(&mut out, b"IEND", &[]);
        debug_assert_eq!(out.len() as u64, target_bytes);
        Ok(out)
    }
}
