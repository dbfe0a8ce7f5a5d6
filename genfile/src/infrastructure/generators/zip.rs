//! ZIP generator: one stored entry of random payload sized so the
//! archive lands on the target. Targets too small for an entry fall
//! back to an empty archive with a sized EOCD comment.

use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;
use crate::engine::zip::{entry_overhead, ZipWriter, EOCD_SIZE};

pub struct ZipGenerator;

const ENTRY_NAME: &str = "data.bin";

impl FileGenerator for ZipGenerator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        if target_bytes < EOCD_SIZE {
            return Err(GenError::SizeTooSmall {
                target: target_bytes,
                minimum: EOCD_SIZE,
            });
        }

        let with_entry = EOCD_SIZE + entry_overhead(ENTRY_NAME);
        let out = if target_bytes >= with_entry {
            let payload_len = (target_bytes - with_entry) as usize;
            let mut payload = vec![0u8; payload_len];
            rng.fill_bytes(&mut payload);
            let mut zip = ZipWriter::new();
            zip.add_entry(ENTRY_NAME, &payload);
            zip.finish(b"")
        } else {
            // Not enough room for headers; the comment is always
            // shorter than the entry overhead, so it fits its u16.
            let comment = vec![b'x'; (target_bytes - EOCD_SIZE) as usize];
            ZipWriter::new().finish(&comment)
        };

        debug_assert_eq!(out.len() as u64, target_bytes);
        Ok(out)
    }
}
