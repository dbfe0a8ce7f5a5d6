//! MP4 generator: `ftyp` + `moov`/`mvhd` skeleton, with the remainder
//! carried by a `free` atom. Remainders too small for an atom header
//! go into the `mdat` payload instead.

use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;
use crate::engine::padding::{render_padding, ContainerPadder, FreeAtomPadder};

pub struct Mp4Generator;

const FTYP_SIZE: u64 = 32;
const MOOV_SIZE: u64 = 8 + 108;
const MDAT_HEADER: u64 = 8;
const BASE_SIZE: u64 = FTYP_SIZE + MOOV_SIZE + MDAT_HEADER;

fn append_ftyp(out: &mut Vec<u8>) {
    out.extend_from_slice(&(FTYP_SIZE as u32).to_be_bytes());
    out.extend_from_slice(b"ftyp");
    out.extend_from_slice(b"isom");
    out.extend_from_slice(&0x0000_0200u32.to_be_bytes());
    for brand in [b"isom", b"iso2", b"avc1", b"mp41"] {
        out.extend_from_slice(brand);
    }
}

fn append_moov(out: &mut Vec<u8>) {
    out.extend_from_slice(&(MOOV_SIZE as u32).to_be_bytes());
    out.extend_from_slice(b"moov");

    out.extend_from_slice(&108u32.to_be_bytes());
    out.extend_from_slice(b"mvhd");
    out.extend_from_slice(&0u32.to_be_bytes()); // version + flags
    out.extend_from_slice(&0u32.to_be_bytes()); // creation
    out.extend_from_slice(&0u32.to_be_bytes()); // modification
    out.extend_from_slice(&1000u32.to_be_bytes()); // timescale
    out.extend_from_slice(&0u32.to_be_bytes()); // duration
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate 1.0
    out.extend_from_slice(&0x0100u16.to_be_bytes()); // volume 1.0
    out.extend_from_slice(&[0u8; 10]); // reserved
    for value in [
        0x0001_0000u32,
        0,
        0,
        0,
        0x0001_0000,
        0,
        0,
        0,
        0x4000_0000,
    ] {
        out.extend_from_slice(&value.to_be_bytes());
    }
    out.extend_from_slice(&[0u8; 24]); // pre_defined
    out.extend_from_slice(&1u32.to_be_bytes()); // next track id
}

impl FileGenerator for Mp4Generator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        if target_bytes < BASE_SIZE {
            return Err(GenError::SizeTooSmall {
                target: target_bytes,
                minimum: BASE_SIZE,
            });
        }

        let padder = FreeAtomPadder;
        let remainder = target_bytes - BASE_SIZE;
        // A remainder below the atom header size rides inside mdat.
        let (mdat_payload, free_bytes) = if remainder < padder.min_block() {
            (remainder, 0)
        } else {
            (0, remainder)
        };

        let mut out = Vec::with_capacity(target_bytes as usize);
        append_ftyp(&mut out);
        append_moov(&mut out);

        out.extend_from_slice(&((MDAT_HEADER + mdat_payload) as u32).to_be_bytes());
        out.extend_from_slice(b"mdat");
        let start = out.len();
        out.resize(start + mdat_payload as usize, 0);
        rng.fill_bytes(&mut out[start..]);

        render_padding(&padder, free_bytes, &mut out)?;
        debug_assert_eq!(out.len() as u64, target_bytes);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(target: u64) -> Vec<u8> {
        let mut rng = rand::rng();
        Mp4Generator.generate(target, &mut rng).unwrap()
    }

    #[test]
    fn atoms_tile_the_file_exactly() {
        for target in [BASE_SIZE, BASE_SIZE + 3, BASE_SIZE + 8, BASE_SIZE + 5000] {
            let bytes = run(target);
            assert_eq!(bytes.len() as u64, target, "target {target}");
            let mut pos = 0usize;
            while pos < bytes.len() {
                let size =
                    u32::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap()) as usize;
                assert!(size >= 8, "undersized atom at {pos}");
                pos += size;
            }
            assert_eq!(pos, bytes.len());
        }
    }

    #[test]
    fn leads_with_ftyp() {
        let bytes = run(500);
        assert_eq!(&bytes[4..8], b"ftyp");
        assert_eq!(&bytes[8..12], b"isom");
    }

    #[test]
    fn large_remainder_becomes_a_free_atom() {
        let bytes = run(BASE_SIZE + 100);
        let free_at = (FTYP_SIZE + MOOV_SIZE + MDAT_HEADER) as usize;
        assert_eq!(&bytes[free_at + 4..free_at + 8], b"free");
    }

    #[test]
    fn below_skeleton_is_rejected() {
        let mut rng = rand::rng();
        assert!(matches!(
            Mp4Generator.generate(100, &mut rng),
            Err(GenError::SizeTooSmall { .. })
        ));
    }
}
