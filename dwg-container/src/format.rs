// SPDX-License-Identifier: MIT
//! On-disk layout constants and fixed structures of the container.
//!
//! The file is a 128-byte header, a 108-byte XOR-masked section
//! directory, then sentinel-bracketed sections in a fixed order:
//! preview, summary info, header variables, classes, objects, handle
//! map, free space.

/// Version string at offset 0 of the file header (R2018).
pub const VERSION_STRING: &[u8; 6] = b"AC1032";

/// File header size in bytes.
pub const FILE_HEADER_SIZE: usize = 128;

/// Masked section directory size in bytes.
pub const DIRECTORY_SIZE: usize = 108;

/// Every section starts and ends with one of these 16-byte constants.
pub const SENTINEL_SIZE: usize = 16;

pub const START_SENTINEL: [u8; 16] = [
    0x30, 0x84, 0xE0, 0xDC, 0x02, 0x21, 0xC7, 0x56, 0xA0, 0x83, 0x97, 0x47, 0xB1, 0x92, 0xCC, 0xA0,
];

pub const END_SENTINEL: [u8; 16] = [
    0x2B, 0x84, 0xDE, 0x31, 0xD7, 0x6C, 0x60, 0x40, 0xAC, 0xDB, 0xBF, 0xF6, 0xED, 0xC3, 0x55, 0xFE,
];

/// Fixed XOR mask applied to the 108-byte directory exactly once,
/// after all offsets are final. A deterministic, publicly known
/// transform that matches the reader's expected representation.
pub const DIRECTORY_XOR_KEY: [u8; DIRECTORY_SIZE] = [
    0x29, 0x23, 0xBE, 0x84, 0xE1, 0x6C, 0xD6, 0xAE, 0x52, 0x90, 0x49, 0xF1, 0xF1, 0xBB, 0xE9, 0xEB,
    0xB3, 0xA6, 0xDB, 0x3C, 0x87, 0x0C, 0x3E, 0x99, 0x24, 0x5E, 0x0D, 0x1C, 0x06, 0xB7, 0x47, 0xDE,
    0xB3, 0x12, 0x4D, 0xC8, 0x43, 0xBB, 0x8B, 0xA6, 0x1F, 0x03, 0x5A, 0x7D, 0x09, 0x38, 0x25, 0x1F,
    0x5D, 0xD4, 0xCB, 0xFC, 0x96, 0xF5, 0x45, 0x3B, 0x13, 0x0D, 0x89, 0x0A, 0x1C, 0xDB, 0xAE, 0x32,
    0x20, 0x9A, 0x50, 0xEE, 0x40, 0x78, 0x36, 0xFD, 0x12, 0x49, 0x32, 0xF6, 0x9E, 0x7D, 0x49, 0xDC,
    0xAD, 0x4F, 0x14, 0xF2, 0x44, 0x40, 0x66, 0xD0, 0x6B, 0xC4, 0x30, 0xB7, 0x32, 0x3B, 0xA1, 0x22,
    0xF6, 0x22, 0x91, 0x9D, 0xE1, 0x8B, 0x1F, 0xDA, 0xB0, 0xCA, 0x99, 0x02,
];

/// Known section name hash codes, as a reader expects them.
pub mod section_hash {
    pub const HEADER: u32 = 0x32B8_03D9;
    pub const CLASSES: u32 = 0x3F54_045F;
    pub const OBJECTS: u32 = 0x674C_05A9;
    pub const HANDLES: u32 = 0x3F6E_0450;
    pub const FREE_SPACE: u32 = 0x77E2_061F;
    pub const PREVIEW: u32 = 0x40AA_0473;
    pub const SUMMARY_INFO: u32 = 0x717A_060F;
}

/// Object type codes used by the writer.
pub mod object_type {
    pub const CIRCLE: i32 = 0x12;
    pub const LINE: i32 = 0x13;
    pub const BLOCK_CONTROL: i32 = 0x30;
    pub const BLOCK_RECORD: i32 = 0x31;
    pub const LAYER_CONTROL: i32 = 0x32;
    pub const LAYER: i32 = 0x33;
    pub const LTYPE_CONTROL: i32 = 0x38;
    pub const LTYPE: i32 = 0x39;
}

/// Pre-assigned handles for the mandatory table objects. Entities are
/// numbered from [`FIRST_ENTITY`](handles::FIRST_ENTITY) upward and
/// never reused.
pub mod handles {
    pub const BLOCK_CONTROL: u32 = 1;
    pub const MODEL_SPACE: u32 = 2;
    pub const LAYER_CONTROL: u32 = 3;
    pub const LAYER_ZERO: u32 = 4;
    pub const LTYPE_CONTROL: u32 = 5;
    pub const LTYPE_CONTINUOUS: u32 = 6;
    pub const FIRST_ENTITY: u32 = 0x100;
}

/// Total size of the summary info section, sentinels included.
pub const SUMMARY_SECTION_SIZE: usize = 128;

/// Total size of the preview section, sentinels included.
pub const PREVIEW_SECTION_SIZE: usize = 0x400;

/// One directory row: name hash, absolute offset, size, and the
/// encryption/encoding flags (always plain/uncompressed here).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub hash: u32,
    pub offset: u32,
    pub size: u32,
    pub encryption: u8,
    pub encoding: u8,
}

impl DirectoryEntry {
    pub const ENCODED_SIZE: usize = 14;

    pub fn new(hash: u32, offset: u32, size: u32) -> Self {
        Self {
            hash,
            offset,
            size,
            encryption: 0,
            encoding: 1,
        }
    }

    pub fn write_to_buffer(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.hash.to_le_bytes());
        buffer.extend_from_slice(&self.offset.to_le_bytes());
        buffer.extend_from_slice(&self.size.to_le_bytes());
        buffer.push(self.encryption);
        buffer.push(self.encoding);
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::ENCODED_SIZE {
            return None;
        }
        Some(Self {
            hash: u32::from_le_bytes(bytes[0..4].try_into().ok()?),
            offset: u32::from_le_bytes(bytes[4..8].try_into().ok()?),
            size: u32::from_le_bytes(bytes[8..12].try_into().ok()?),
            encryption: bytes[12],
            encoding: bytes[13],
        })
    }
}

/// Encode a full 108-byte directory and apply the XOR mask.
pub fn encode_directory(entries: &[DirectoryEntry]) -> [u8; DIRECTORY_SIZE] {
    debug_assert!(entries.len() * DirectoryEntry::ENCODED_SIZE <= DIRECTORY_SIZE);
    let mut plain = Vec::with_capacity(DIRECTORY_SIZE);
    for entry in entries {
        entry.write_to_buffer(&mut plain);
    }
    plain.resize(DIRECTORY_SIZE, 0);

    let mut masked = [0u8; DIRECTORY_SIZE];
    for (i, byte) in plain.iter().enumerate() {
        masked[i] = byte ^ DIRECTORY_XOR_KEY[i];
    }
    masked
}

/// Strip the XOR mask from a raw 108-byte directory.
pub fn decode_directory(masked: &[u8; DIRECTORY_SIZE]) -> [u8; DIRECTORY_SIZE] {
    let mut plain = [0u8; DIRECTORY_SIZE];
    for i in 0..DIRECTORY_SIZE {
        plain[i] = masked[i] ^ DIRECTORY_XOR_KEY[i];
    }
    plain
}

/// The fixed 128-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Absolute offset of the preview section.
    pub preview_offset: u32,
    /// Absolute offset of the summary info section.
    pub summary_offset: u32,
}

impl FileHeader {
    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut header = [0u8; FILE_HEADER_SIZE];
        header[0..6].copy_from_slice(VERSION_STRING);
        // Maintenance version.
        header[0x0C] = 0x01;
        header[0x0D..0x11].copy_from_slice(&self.preview_offset.to_le_bytes());
        // Application version and maintenance version.
        header[0x11] = 0x1C;
        header[0x12] = 0x00;
        // Codepage ANSI_1252.
        header[0x13] = 0xE4;
        header[0x14] = 0x04;
        header[0x20..0x24].copy_from_slice(&self.summary_offset.to_le_bytes());
        header[0x28..0x2C].copy_from_slice(&0x0000_0080u32.to_le_bytes());
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_mask_round_trips() {
        let entries = [
            DirectoryEntry::new(section_hash::HEADER, 236, 32),
            DirectoryEntry::new(section_hash::OBJECTS, 268, 512),
        ];
        let masked = encode_directory(&entries);
        let plain = decode_directory(&masked);
        let first = DirectoryEntry::from_bytes(&plain).unwrap();
        assert_eq!(first, entries[0]);
        let second = DirectoryEntry::from_bytes(&plain[DirectoryEntry::ENCODED_SIZE..]).unwrap();
        assert_eq!(second, entries[1]);
    }

    #[test]
    fn masked_directory_differs_from_plain() {
        let masked = encode_directory(&[]);
        assert_eq!(masked, DIRECTORY_XOR_KEY);
    }

    #[test]
    fn header_is_exactly_128_bytes_with_version() {
        let header = FileHeader {
            preview_offset: 236,
            summary_offset: 236 + PREVIEW_SECTION_SIZE as u32,
        }
        .to_bytes();
        assert_eq!(header.len(), FILE_HEADER_SIZE);
        assert_eq!(&header[0..6], VERSION_STRING);
        assert_eq!(
            u32::from_le_bytes(header[0x0D..0x11].try_into().unwrap()),
            236
        );
    }
}
