//! Minimal store-only ZIP writer.
//!
//! Entries are never compressed, so every byte of the archive is a
//! deterministic function of the entry names and payload lengths. That
//! property is what lets archive-based formats (ZIP, XLSX, DOCX) be
//! planned to an exact total size. Timestamps are pinned to a fixed
//! DOS date for the same reason.

/// Local file header size, excluding the name.
pub const LOCAL_HEADER_SIZE: u64 = 30;
/// Central directory header size, excluding the name.
pub const CENTRAL_HEADER_SIZE: u64 = 46;
/// End-of-central-directory record size, excluding the comment.
pub const EOCD_SIZE: u64 = 22;

/// 2024-01-01, 00:00:00 in DOS date/time encoding.
const DOS_DATE: u16 = ((2024 - 1980) << 9) | (1 << 5) | 1;
const DOS_TIME: u16 = 0;

/// Bytes a stored entry adds beyond its payload: local header,
/// central directory header, and the name twice.
pub fn entry_overhead(name: &str) -> u64 {
    LOCAL_HEADER_SIZE + CENTRAL_HEADER_SIZE + 2 * name.len() as u64
}

struct EntryMeta {
    name: String,
    crc: u32,
    size: u32,
    local_offset: u32,
}

/// Accumulates stored entries and finishes with a central directory
/// and EOCD record.
pub struct ZipWriter {
    buf: Vec<u8>,
    entries: Vec<EntryMeta>,
}

impl ZipWriter {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Append one stored (uncompressed) entry.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) {
        let crc = crc32fast::hash(data);
        let local_offset = self.buf.len() as u32;

        self.buf.extend_from_slice(&0x0403_4B50u32.to_le_bytes());
        self.buf.extend_from_slice(&20u16.to_le_bytes()); // version needed
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // flags
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // method: store
        self.buf.extend_from_slice(&DOS_TIME.to_le_bytes());
        self.buf.extend_from_slice(&DOS_DATE.to_le_bytes());
        self.buf.extend_from_slice(&crc.to_le_bytes());
        self.buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // extra len
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(data);

        self.entries.push(EntryMeta {
            name: name.to_string(),
            crc,
            size: data.len() as u32,
            local_offset,
        });
    }

    /// Archive size so far plus central directory and EOCD, before any
    /// comment bytes.
    pub fn size_when_finished(&self) -> u64 {
        let central: u64 = self
            .entries
            .iter()
            .map(|e| CENTRAL_HEADER_SIZE + e.name.len() as u64)
            .sum();
        self.buf.len() as u64 + central + EOCD_SIZE
    }

    /// Write the central directory and EOCD. The comment is appended
    /// verbatim and must fit the EOCD's u16 length field.
    pub fn finish(mut self, comment: &[u8]) -> Vec<u8> {
        debug_assert!(comment.len() <= u16::MAX as usize);
        let central_offset = self.buf.len() as u32;

        for entry in &self.entries {
            self.buf.extend_from_slice(&0x0201_4B50u32.to_le_bytes());
            self.buf.extend_from_slice(&20u16.to_le_bytes()); // made by
            self.buf.extend_from_slice(&20u16.to_le_bytes()); // needed
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // flags
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // store
            self.buf.extend_from_slice(&DOS_TIME.to_le_bytes());
            self.buf.extend_from_slice(&DOS_DATE.to_le_bytes());
            self.buf.extend_from_slice(&entry.crc.to_le_bytes());
            self.buf.extend_from_slice(&entry.size.to_le_bytes());
            self.buf.extend_from_slice(&entry.size.to_le_bytes());
            self.buf
                .extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // extra
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // comment
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // disk
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // int attrs
            self.buf.extend_from_slice(&0u32.to_le_bytes()); // ext attrs
            self.buf.extend_from_slice(&entry.local_offset.to_le_bytes());
            self.buf.extend_from_slice(entry.name.as_bytes());
        }

        let central_size = self.buf.len() as u32 - central_offset;
        let count = self.entries.len() as u16;

        self.buf.extend_from_slice(&0x0605_4B50u32.to_le_bytes());
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // disk
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // cd disk
        self.buf.extend_from_slice(&count.to_le_bytes());
        self.buf.extend_from_slice(&count.to_le_bytes());
        self.buf.extend_from_slice(&central_size.to_le_bytes());
        self.buf.extend_from_slice(&central_offset.to_le_bytes());
        self.buf
            .extend_from_slice(&(comment.len() as u16).to_le_bytes());
        self.buf.extend_from_slice(comment);
        self.buf
    }
}

impl Default for ZipWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_archive_is_a_bare_eocd() {
        let bytes = ZipWriter::new().finish(b"");
        assert_eq!(bytes.len() as u64, EOCD_SIZE);
        assert_eq!(&bytes[0..4], &0x0605_4B50u32.to_le_bytes());
    }

    #[test]
    fn size_prediction_matches_reality() {
        let mut zip = ZipWriter::new();
        zip.add_entry("a.bin", &[1, 2, 3]);
        zip.add_entry("dir/b.txt", b"hello");
        let predicted = zip.size_when_finished();
        assert_eq!(zip.finish(b"").len() as u64, predicted);
    }

    #[test]
    fn entry_overhead_matches_writer() {
        let mut zip = ZipWriter::new();
        let empty = zip.size_when_finished();
        zip.add_entry("pad.bin", &[]);
        assert_eq!(zip.size_when_finished() - empty, entry_overhead("pad.bin"));
        assert_eq!(entry_overhead("pad.bin"), 90);
    }

    #[test]
    fn comment_extends_archive_byte_for_byte() {
        let zip = ZipWriter::new();
        let predicted = zip.size_when_finished();
        let bytes = zip.finish(&[b'z'; 37]);
        assert_eq!(bytes.len() as u64, predicted + 37);
        // Comment length is recorded in the EOCD.
        let at = bytes.len() - 37 - 2;
        assert_eq!(u16::from_le_bytes([bytes[at], bytes[at + 1]]), 37);
    }

    #[test]
    fn local_and_central_headers_agree_on_crc() {
        let data = b"payload bytes";
        let mut zip = ZipWriter::new();
        zip.add_entry("f", data);
        let bytes = zip.finish(b"");
        let crc = crc32fast::hash(data);
        assert_eq!(&bytes[14..18], &crc.to_le_bytes());
        let central = 30 + 1 + data.len();
        assert_eq!(&bytes[central + 16..central + 20], &crc.to_le_bytes());
    }
}
