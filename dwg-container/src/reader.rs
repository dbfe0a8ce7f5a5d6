// SPDX-License-Identifier: MIT
//! Structural reader for drawing files produced by this crate.
//!
//! The reader is a verification tool, not a CAD importer: it checks
//! the header, unmasks the directory, walks every section's sentinels,
//! confirms the sections tile the file exactly, parses the handle map
//! and decodes the model-space record far enough to recover the owned
//! entity count.

use crate::format::{
    decode_directory, handles, object_type, section_hash, DirectoryEntry, DIRECTORY_SIZE,
    END_SENTINEL, FILE_HEADER_SIZE, SENTINEL_SIZE, START_SENTINEL, VERSION_STRING,
};

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("file too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("unrecognized version string")]
    BadVersion,

    #[error("section {hash:#010x} extends past end of file")]
    SectionOutOfBounds { hash: u32 },

    #[error("section {hash:#010x} has a corrupt sentinel")]
    BadSentinel { hash: u32 },

    #[error("sections cover {covered} bytes but file is {len} bytes")]
    SizeMismatch { covered: usize, len: usize },

    #[error("directory has no section {hash:#010x}")]
    MissingSection { hash: u32 },

    #[error("handle map is truncated")]
    BadHandleIndex,

    #[error("malformed object record at section offset {offset}")]
    BadObjectRecord { offset: usize },
}

/// One row of the handle map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleRow {
    pub handle: u32,
    /// Offset of the record, relative to the objects section start.
    pub offset: u32,
}

/// Parsed structural view of a drawing file.
#[derive(Debug)]
pub struct Drawing {
    pub directory: Vec<DirectoryEntry>,
    pub handle_index: Vec<HandleRow>,
    /// Owned-object count decoded from the model-space block record.
    pub entity_count: u16,
}

impl Drawing {
    /// Parse and verify a complete drawing file.
    pub fn parse(bytes: &[u8]) -> Result<Self, ReadError> {
        let min = FILE_HEADER_SIZE + DIRECTORY_SIZE;
        if bytes.len() < min {
            return Err(ReadError::TooShort {
                len: bytes.len(),
                min,
            });
        }
        if &bytes[0..VERSION_STRING.len()] != VERSION_STRING {
            return Err(ReadError::BadVersion);
        }

        let masked: &[u8; DIRECTORY_SIZE] = bytes[FILE_HEADER_SIZE..min]
            .try_into()
            .map_err(|_| ReadError::TooShort {
                len: bytes.len(),
                min,
            })?;
        let plain = decode_directory(masked);

        let mut directory = Vec::new();
        for row in plain.chunks_exact(DirectoryEntry::ENCODED_SIZE) {
            let entry = match DirectoryEntry::from_bytes(row) {
                Some(entry) => entry,
                None => break,
            };
            if entry.hash == 0 {
                break;
            }
            directory.push(entry);
        }

        let mut covered = min;
        for entry in &directory {
            let section = section_slice(bytes, entry)?;
            check_sentinels(section, entry.hash)?;
            covered += entry.size as usize;
        }
        if covered != bytes.len() {
            return Err(ReadError::SizeMismatch {
                covered,
                len: bytes.len(),
            });
        }

        let handles_entry = find_section(&directory, section_hash::HANDLES)?;
        let handle_index = parse_handle_index(section_slice(bytes, &handles_entry)?)?;

        let objects_entry = find_section(&directory, section_hash::OBJECTS)?;
        let objects = section_slice(bytes, &objects_entry)?;
        let model_space = handle_index
            .iter()
            .find(|row| row.handle == handles::MODEL_SPACE)
            .ok_or(ReadError::MissingSection {
                hash: section_hash::OBJECTS,
            })?;
        let entity_count = decode_owned_count(objects, model_space.offset as usize)?;

        Ok(Self {
            directory,
            handle_index,
            entity_count,
        })
    }

    /// Handles at or above the entity range, in map order.
    pub fn entity_handles(&self) -> impl Iterator<Item = u32> + '_ {
        self.handle_index
            .iter()
            .map(|row| row.handle)
            .filter(|&h| h >= handles::FIRST_ENTITY)
    }
}

fn find_section(directory: &[DirectoryEntry], hash: u32) -> Result<DirectoryEntry, ReadError> {
    directory
        .iter()
        .copied()
        .find(|entry| entry.hash == hash)
        .ok_or(ReadError::MissingSection { hash })
}

fn section_slice<'a>(bytes: &'a [u8], entry: &DirectoryEntry) -> Result<&'a [u8], ReadError> {
    let start = entry.offset as usize;
    let end = start
        .checked_add(entry.size as usize)
        .filter(|&end| end <= bytes.len())
        .ok_or(ReadError::SectionOutOfBounds { hash: entry.hash })?;
    Ok(&bytes[start..end])
}

fn check_sentinels(section: &[u8], hash: u32) -> Result<(), ReadError> {
    if section.len() < 2 * SENTINEL_SIZE
        || section[..SENTINEL_SIZE] != START_SENTINEL
        || section[section.len() - SENTINEL_SIZE..] != END_SENTINEL
    {
        return Err(ReadError::BadSentinel { hash });
    }
    Ok(())
}

fn parse_handle_index(section: &[u8]) -> Result<Vec<HandleRow>, ReadError> {
    let payload = &section[SENTINEL_SIZE..section.len() - SENTINEL_SIZE];
    let mut rows = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let n = payload[pos] as usize;
        pos += 1;
        if n == 0 || n > 4 || pos + n + 4 > payload.len() {
            return Err(ReadError::BadHandleIndex);
        }
        let mut handle = 0u32;
        for (i, &byte) in payload[pos..pos + n].iter().enumerate() {
            handle |= (byte as u32) << (8 * i);
        }
        pos += n;
        let offset = u32::from_le_bytes(
            payload[pos..pos + 4]
                .try_into()
                .map_err(|_| ReadError::BadHandleIndex)?,
        );
        pos += 4;
        rows.push(HandleRow { handle, offset });
    }
    Ok(rows)
}

/// Decode the owned-object count out of the model-space block record:
/// skip the type field, the name and the flags, then read the count,
/// which the writer always stores in the wide 16-bit form.
fn decode_owned_count(objects: &[u8], offset: usize) -> Result<u16, ReadError> {
    let record_len = objects
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]) as usize)
        .ok_or(ReadError::BadObjectRecord { offset })?;
    let body = objects
        .get(offset + 2..offset + 2 + record_len)
        .ok_or(ReadError::BadObjectRecord { offset })?;

    let mut r = BitReader::new(body);
    let object_kind = r.read_bit_short().ok_or(ReadError::BadObjectRecord { offset })?;
    if object_kind != object_type::BLOCK_RECORD {
        return Err(ReadError::BadObjectRecord { offset });
    }
    r.byte_align();
    let name_len = r.read_byte().ok_or(ReadError::BadObjectRecord { offset })? as usize;
    r.skip_bytes(name_len).ok_or(ReadError::BadObjectRecord { offset })?;
    // Block flags.
    r.read_bit_short().ok_or(ReadError::BadObjectRecord { offset })?;
    // Wide-form count: 00 selector then two raw bytes, low first.
    if r.read_bits(2) != Some(0b00) {
        return Err(ReadError::BadObjectRecord { offset });
    }
    let low = r.read_bits(8).ok_or(ReadError::BadObjectRecord { offset })?;
    let high = r.read_bits(8).ok_or(ReadError::BadObjectRecord { offset })?;
    Ok(((high as u16) << 8) | low as u16)
}

/// MSB-first bit cursor over a byte slice, mirror of the writer.
struct BitReader<'a> {
    buf: &'a [u8],
    byte: usize,
    cursor: u8,
}

impl<'a> BitReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            byte: 0,
            cursor: 0,
        }
    }

    fn read_bits(&mut self, n: u8) -> Option<u64> {
        let mut value = 0u64;
        let mut remaining = n;
        while remaining > 0 {
            let current = *self.buf.get(self.byte)?;
            let free = 8 - self.cursor;
            let take = remaining.min(free);
            let chunk = (current >> (free - take)) & ((1u16 << take) - 1) as u8;
            value = (value << take) | chunk as u64;
            self.cursor += take;
            if self.cursor == 8 {
                self.cursor = 0;
                self.byte += 1;
            }
            remaining -= take;
        }
        Some(value)
    }

    fn byte_align(&mut self) {
        if self.cursor != 0 {
            self.cursor = 0;
            self.byte += 1;
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.byte_align();
        let b = *self.buf.get(self.byte)?;
        self.byte += 1;
        Some(b)
    }

    fn skip_bytes(&mut self, n: usize) -> Option<()> {
        self.byte_align();
        if self.byte + n > self.buf.len() {
            return None;
        }
        self.byte += n;
        Some(())
    }

    /// Variable-width short integer, mirror of the writer's encoding.
    fn read_bit_short(&mut self) -> Option<i32> {
        match self.read_bits(2)? {
            0b10 => Some(0),
            0b11 => Some(256),
            0b01 => Some(self.read_bits(8)? as i32),
            _ => {
                let low = self.read_bits(8)?;
                let high = self.read_bits(8)?;
                Some((((high as u16) << 8) | low as u16) as i32)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::DrawingBuilder;

    fn build(target: u64) -> Vec<u8> {
        let mut rng = rand::rng();
        DrawingBuilder::new(target).unwrap().build(&mut rng).unwrap()
    }

    #[test]
    fn parses_own_output() {
        let bytes = build(10_000);
        let drawing = Drawing::parse(&bytes).unwrap();
        assert_eq!(drawing.directory.len(), 7);
        assert!(drawing.entity_count > 0);
    }

    #[test]
    fn entity_count_matches_handle_map() {
        let bytes = build(20_000);
        let drawing = Drawing::parse(&bytes).unwrap();
        assert_eq!(
            drawing.entity_handles().count(),
            drawing.entity_count as usize
        );
    }

    #[test]
    fn handle_index_is_sorted_ascending() {
        let bytes = build(15_000);
        let drawing = Drawing::parse(&bytes).unwrap();
        let handles: Vec<u32> = drawing.handle_index.iter().map(|r| r.handle).collect();
        let mut sorted = handles.clone();
        sorted.sort_unstable();
        assert_eq!(handles, sorted);
    }

    #[test]
    fn larger_budget_never_means_fewer_entities() {
        let small = Drawing::parse(&build(6000)).unwrap();
        let large = Drawing::parse(&build(60_000)).unwrap();
        assert!(large.entity_count >= small.entity_count);
    }

    #[test]
    fn rejects_wrong_version() {
        let mut bytes = build(5000);
        bytes[0] = b'X';
        assert!(matches!(
            Drawing::parse(&bytes),
            Err(ReadError::BadVersion)
        ));
    }

    #[test]
    fn rejects_truncated_file() {
        let bytes = build(5000);
        assert!(matches!(
            Drawing::parse(&bytes[..bytes.len() - 1]),
            Err(ReadError::SectionOutOfBounds { .. })
        ));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let mut bytes = build(5000);
        bytes.push(0);
        assert!(matches!(
            Drawing::parse(&bytes),
            Err(ReadError::SizeMismatch { covered: 5000, len: 5001 })
        ));
    }

    #[test]
    fn rejects_corrupt_sentinel() {
        let mut bytes = build(5000);
        // First section starts right after the directory.
        bytes[236] ^= 0xFF;
        assert!(matches!(
            Drawing::parse(&bytes),
            Err(ReadError::BadSentinel { .. })
        ));
    }
}
