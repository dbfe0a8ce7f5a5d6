//! WAV generator: canonical 44-byte header over 8-bit mono PCM noise.
//! The two RIFF size fields are pure arithmetic on the target, so any
//! size from the bare header up is exact.

use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;

pub struct WavGenerator;

const HEADER_SIZE: u64 = 44;
const SAMPLE_RATE: u32 = 8000;

impl FileGenerator for WavGenerator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        if target_bytes < HEADER_SIZE {
            return Err(GenError::SizeTooSmall {
                target: target_bytes,
                minimum: HEADER_SIZE,
            });
        }
        if target_bytes - 8 > u32::MAX as u64 {
            return Err(GenError::Encoding(
                "RIFF chunk size field limits WAV files to 4 GiB".into(),
            ));
        }

        let data_len = target_bytes - HEADER_SIZE;
        let mut out = Vec::with_capacity(target_bytes as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&((target_bytes - 8) as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        out.extend_from_slice(&SAMPLE_RATE.to_le_bytes()); // byte rate
        out.extend_from_slice(&1u16.to_le_bytes()); // block align
        out.extend_from_slice(&8u16.to_le_bytes()); // bits per sample

        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data_len as u32).to_le_bytes());
        let start = out.len();
        out.resize(start + data_len as usize, 0);
        rng.fill_bytes(&mut out[start..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(target: u64) -> Vec<u8> {
        let mut rng = rand::rng();
        WavGenerator.generate(target, &mut rng).unwrap()
    }

    #[test]
    fn header_math_is_consistent() {
        let bytes = run(1000);
        assert_eq!(bytes.len(), 1000);
        assert_eq!(&bytes[0..4], b"RIFF");
        let riff = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        assert_eq!(riff as u64, 1000 - 8);
        let data = u32::from_le_bytes(bytes[40..44].try_into().unwrap());
        assert_eq!(data as u64, 1000 - 44);
    }

    #[test]
    fn bare_header_is_the_minimum() {
        assert_eq!(run(44).len(), 44);
        let mut rng = rand::rng();
        assert!(matches!(
            WavGenerator.generate(43, &mut rng),
            Err(GenError::SizeTooSmall { minimum: 44, .. })
        ));
    }
}
