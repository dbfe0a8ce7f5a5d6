//! Plain-text family: free text, CSV and JSON.
//!
//! These formats tolerate arbitrary cut points (text) or can absorb
//! any remainder inside a field or a whitespace run, so they hit the
//! target without a planning pass.

use rand::{Rng, RngCore};

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
    "eiusmod", "tempor", "incididunt", "labore", "dolore", "magna", "aliqua", "enim", "minim",
    "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip",
];

fn random_word(rng: &mut dyn RngCore) -> &'static str {
    WORDS[rng.random_range(0..WORDS.len())]
}

/// Word-wrapped filler text, truncated to the exact byte count.
pub struct TextGenerator;

impl FileGenerator for TextGenerator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        let target = target_bytes as usize;
        let mut out = String::with_capacity(target + 16);
        let mut column = 0usize;
        while out.len() < target {
            let word = random_word(rng);
            if column + word.len() + 1 > 76 {
                out.push('\n');
                column = 0;
            } else if column > 0 {
                out.push(' ');
                column += 1;
            }
            out.push_str(word);
            column += word.len();
        }
        let mut bytes = out.into_bytes();
        bytes.truncate(target);
        Ok(bytes)
    }
}

/// CSV with a fixed header and random rows; the last row's name field
/// is stretched to land exactly on the target.
pub struct CsvGenerator;

const CSV_HEADER: &str = "id,name,value\n";
/// Rows get emitted normally while at least this much budget remains,
/// guaranteeing the closing row has room for its fixed fields.
const CSV_FINAL_RESERVE: usize = 48;

impl FileGenerator for CsvGenerator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        let target = target_bytes as usize;
        if target <= CSV_HEADER.len() {
            return Ok(CSV_HEADER.as_bytes()[..target].to_vec());
        }

        let mut out = String::with_capacity(target);
        out.push_str(CSV_HEADER);
        let mut id = 1u64;
        while target - out.len() > CSV_FINAL_RESERVE {
            let row = format!(
                "{id},{},{}\n",
                random_word(rng),
                rng.random_range(0..10_000)
            );
            out.push_str(&row);
            id += 1;
        }

        let remaining = target - out.len();
        if remaining >= 6 {
            // "0," + name + ",0\n" sized to the byte.
            let name_len = remaining - 5;
            out.push_str("0,");
            out.extend(std::iter::repeat('x').take(name_len));
            out.push_str(",0\n");
        } else {
            // Too small for a well-formed row; a trailing partial
            // field keeps the byte count exact.
            out.extend(std::iter::repeat('x').take(remaining));
        }
        Ok(out.into_bytes())
    }
}

/// JSON document with an item array filled greedily and a padding
/// string sized to close the gap.
pub struct JsonGenerator;

const JSON_OPEN: &str = "{\"items\":[";
const JSON_CLOSE_PREFIX: &str = "],\"padding\":\"";
const JSON_CLOSE_SUFFIX: &str = "\"}";

impl FileGenerator for JsonGenerator {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        let target = target_bytes as usize;
        let min_full =
            JSON_OPEN.len() + JSON_CLOSE_PREFIX.len() + JSON_CLOSE_SUFFIX.len();

        if target == 0 {
            return Ok(Vec::new());
        }
        if target == 1 {
            return Ok(b"0".to_vec());
        }
        if target < min_full {
            // A whitespace-padded empty object is still valid JSON.
            let mut out = String::with_capacity(target);
            out.push('{');
            out.extend(std::iter::repeat(' ').take(target - 2));
            out.push('}');
            return Ok(out.into_bytes());
        }

        let mut out = String::with_capacity(target);
        out.push_str(JSON_OPEN);
        let close_overhead = JSON_CLOSE_PREFIX.len() + JSON_CLOSE_SUFFIX.len();
        let mut first = true;
        loop {
            let item = format!(
                "{}{{\"id\":{},\"value\":{}}}",
                if first { "" } else { "," },
                out.len(),
                rng.random_range(0..1000)
            );
            if out.len() + item.len() + close_overhead > target {
                break;
            }
            out.push_str(&item);
            first = false;
        }

        let pad = target - out.len() - close_overhead;
        out.push_str(JSON_CLOSE_PREFIX);
        out.extend(std::iter::repeat('x').take(pad));
        out.push_str(JSON_CLOSE_SUFFIX);
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(generator: &dyn FileGenerator, target: u64) -> Vec<u8> {
        let mut rng = rand::rng();
        generator.generate(target, &mut rng).unwrap()
    }

    #[test]
    fn text_is_exact_at_any_size() {
        for target in [0u64, 1, 75, 76, 77, 10_000] {
            assert_eq!(run(&TextGenerator, target).len() as u64, target);
        }
    }

    #[test]
    fn csv_has_header_and_exact_size() {
        let bytes = run(&CsvGenerator, 500);
        assert_eq!(bytes.len(), 500);
        assert!(bytes.starts_with(b"id,name,value\n"));
    }

    #[test]
    fn csv_tiny_targets_truncate_the_header() {
        assert_eq!(run(&CsvGenerator, 5), b"id,na".to_vec());
    }

    #[test]
    fn csv_final_row_is_well_formed() {
        let bytes = run(&CsvGenerator, 2000);
        let text = String::from_utf8(bytes).unwrap();
        let last = text.trim_end_matches('\n').rsplit('\n').next().unwrap();
        assert_eq!(last.split(',').count(), 3);
    }

    #[test]
    fn json_is_exact_and_balanced() {
        for target in [2u64, 5, 24, 25, 26, 100, 5000] {
            let bytes = run(&JsonGenerator, target);
            assert_eq!(bytes.len() as u64, target, "target {target}");
            assert_eq!(bytes.first(), Some(&b'{'));
            assert_eq!(bytes.last(), Some(&b'}'));
        }
    }

    #[test]
    fn json_single_byte_is_a_number() {
        assert_eq!(run(&JsonGenerator, 1), b"0".to_vec());
    }
}
