//! DXF generator.
//!
//! An ENTITIES section filled greedily with random LINE entities,
//! preceded by `999` comment groups that absorb the remainder. One
//! comment is always reserved, so any leftover byte count from zero up
//! is expressible.

use rand::{Rng, RngCore};

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;
use crate::engine::padding::{render_padding, ContainerPadder};

pub struct DxfGenerator;

const SECTION_OPEN: &str = "0\nSECTION\n2\nENTITIES\n";
const SECTION_CLOSE: &str = "0\nENDSEC\n0\nEOF\n";

/// `999` comment group: `999\n` + text + `\n`. Group text is capped at
/// 255 characters.
struct CommentPadder;

impl ContainerPadder for CommentPadder {
    fn min_block(&self) -> u64 {
        5
    }

    fn max_block(&self) -> u64 {
        5 + 255
    }

    fn render_block(&self, size: u64, out: &mut Vec<u8>) {
        out.extend_from_slice(b"999\n");
        out.resize(out.len() + (size - 5) as usize, b'x');
        out.push(b'\n');
    }
}

fn line_entity(rng: &mut dyn RngCore) -> String {
    let coord = |rng: &mut dyn RngCore| rng.random_range(-1000..1000) as f64;
    format!(
        "0\nLINE\n8\n0\n10\n{:.1}\n20\n{:.1}\n30\n0.0\n11\n{:.1}\n21\n{:.1}\n31\n0.0\n",
        coord(rng),
        coord(rng),
        coord(rng),
        coord(rng)
    )
}

impl FileGenerator for DxfGenerator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        let padder = CommentPadder;
        let fixed = (SECTION_OPEN.len() + SECTION_CLOSE.len()) as u64;
        let minimum = fixed + padder.min_block();
        if target_bytes < minimum {
            return Err(GenError::SizeTooSmall {
                target: target_bytes,
                minimum,
            });
        }

        let mut entities = String::new();
        let mut used = fixed;
        loop {
            let entity = line_entity(rng);
            if used + entity.len() as u64 + padder.min_block() > target_bytes {
                break;
            }
            used += entity.len() as u64;
            entities.push_str(&entity);
        }

        let mut out = Vec::with_capacity(target_bytes as usize);
        render_padding(&padder, target_bytes - used, &mut out)?;
        out.extend_from_slice(SECTION_OPEN.as_bytes());
        out.extend_from_slice(entities.as_bytes());
        out.extend_from_slice(SECTION_CLOSE.as_bytes());
        debug_assert_eq!(out.len() as u64, target_bytes);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(target: u64) -> Vec<u8> {
        let mut rng = rand::rng();
        DxfGenerator.generate(target, &mut rng).unwrap()
    }

    #[test]
    fn exact_across_a_small_sweep() {
        let minimum = (SECTION_OPEN.len() + SECTION_CLOSE.len()) as u64 + 5;
        for target in minimum..minimum + 20 {
            assert_eq!(run(target).len() as u64, target, "target {target}");
        }
    }

    #[test]
    fn ends_with_eof_and_contains_entities() {
        let bytes = run(5000);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with("0\nEOF\n"));
        assert!(text.contains("0\nLINE\n"));
        assert!(text.contains("0\nSECTION\n2\nENTITIES\n"));
    }

    #[test]
    fn comments_lead_the_file() {
        let bytes = run(1000);
        assert!(bytes.starts_with(b"999\n"));
    }

    #[test]
    fn below_minimum_is_rejected() {
        let mut rng = rand::rng();
        assert!(matches!(
            DxfGenerator.generate(10, &mut rng),
            Err(GenError::SizeTooSmall { .. })
        ));
    }
}
