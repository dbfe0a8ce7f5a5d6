// SPDX-License-Identifier: MIT
//! Builder for complete drawing files of an exact byte length.
//!
//! Construction is strictly sequential: the mandatory table objects
//! are written first, random LINE/CIRCLE entities are appended
//! greedily while they fit the byte budget, the model-space record's
//! owned-object count is patched in place, and the free-space section
//! absorbs the exact remainder.

use rand::Rng;

use crate::bits::BitWriter;
use crate::codec::{
    handle_bytes, write_bit_double, write_bit_short, write_bit_short_full, write_handle_ref,
    write_text,
};
use crate::format::{
    encode_directory, handles, object_type, section_hash, DirectoryEntry, FileHeader,
    DIRECTORY_SIZE, END_SENTINEL, FILE_HEADER_SIZE, PREVIEW_SECTION_SIZE, SENTINEL_SIZE,
    START_SENTINEL, SUMMARY_SECTION_SIZE,
};

/// Errors that can occur while building a drawing.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("target size {target} below minimum container size {required}")]
    SizeTooSmall { target: u64, required: u64 },

    #[error("retroactive count patch changed record length ({original} -> {patched})")]
    RetroactivePatch { original: usize, patched: usize },
}

/// Handle map row: section-relative offset of the record, assigned at
/// append time and immutable thereafter.
#[derive(Debug, Clone, Copy)]
struct HandleEntry {
    handle: u32,
    offset: u32,
}

impl HandleEntry {
    /// Serialized cost in the handle map: length byte + handle value
    /// bytes + 4-byte offset.
    fn map_cost(handle: u32) -> usize {
        1 + handle_bytes(handle).len() + 4
    }
}

/// Builds one drawing file for one byte budget.
#[derive(Debug)]
pub struct DrawingBuilder {
    target: usize,
    /// Objects section payload, start sentinel included.
    objects: Vec<u8>,
    handle_index: Vec<HandleEntry>,
    /// Cumulative byte cost of the serialized handle map rows.
    handles_payload: usize,
    entity_count: u16,
    next_entity_handle: u32,
    /// Offset and length of the model-space record inside `objects`,
    /// kept for the retroactive owned-object-count patch.
    model_space_site: (usize, usize),
}

/// Everything outside the objects, handles and free sections has a
/// fixed size.
const FIXED_PREFIX: usize = FILE_HEADER_SIZE
    + DIRECTORY_SIZE
    + PREVIEW_SECTION_SIZE
    + SUMMARY_SECTION_SIZE
    + HEADER_VARS_SECTION_SIZE
    + CLASSES_SECTION_SIZE;

/// Header variables and classes sections carry no payload here, just
/// their bracketing sentinels.
const HEADER_VARS_SECTION_SIZE: usize = 2 * SENTINEL_SIZE;
const CLASSES_SECTION_SIZE: usize = 2 * SENTINEL_SIZE;

/// Sentinel-only overhead of the free-space section.
const FREE_SECTION_MIN: usize = 2 * SENTINEL_SIZE;

impl DrawingBuilder {
    /// Start a drawing for the given total byte budget. Fails with
    /// [`WriteError::SizeTooSmall`] when the budget cannot hold the
    /// mandatory sections.
    pub fn new(target: u64) -> Result<Self, WriteError> {
        let builder = Self::with_mandatory_objects(target as usize);
        let required = builder.total_if_closed_now() as u64;
        if target < required {
            return Err(WriteError::SizeTooSmall { target, required });
        }
        Ok(builder)
    }

    /// Minimum representable file size: mandatory sections only.
    pub fn minimum_size() -> u64 {
        Self::with_mandatory_objects(0).total_if_closed_now() as u64
    }

    fn with_mandatory_objects(target: usize) -> Self {
        let mut builder = Self {
            target,
            objects: Vec::new(),
            handle_index: Vec::new(),
            handles_payload: 0,
            entity_count: 0,
            next_entity_handle: handles::FIRST_ENTITY,
            model_space_site: (0, 0),
        };
        builder.objects.extend_from_slice(&START_SENTINEL);
        builder.write_table_objects();
        builder
    }

    /// Append random entities while they fit, patch the owned-object
    /// count, close all sections and return the finished file.
    pub fn build(mut self, rng: &mut impl Rng) -> Result<Vec<u8>, WriteError> {
        self.fill_with_entities(rng);
        self.patch_owned_count()?;

        let target = self.target;
        self.objects.extend_from_slice(&END_SENTINEL);

        // Handle map, ascending by handle.
        self.handle_index.sort_by_key(|entry| entry.handle);
        let mut handles_sec = Vec::with_capacity(self.handles_payload + 2 * SENTINEL_SIZE);
        handles_sec.extend_from_slice(&START_SENTINEL);
        for entry in &self.handle_index {
            let value_bytes = handle_bytes(entry.handle);
            handles_sec.push(value_bytes.len() as u8);
            handles_sec.extend_from_slice(&value_bytes);
            handles_sec.extend_from_slice(&entry.offset.to_le_bytes());
        }
        handles_sec.extend_from_slice(&END_SENTINEL);

        // Free space absorbs the exact remainder of the budget.
        let used = FIXED_PREFIX + self.objects.len() + handles_sec.len() + FREE_SECTION_MIN;
        debug_assert!(used <= target, "greedy fill must never overshoot");
        let mut free_sec = Vec::with_capacity(target - used + FREE_SECTION_MIN);
        free_sec.extend_from_slice(&START_SENTINEL);
        free_sec.resize(free_sec.len() + (target - used), 0);
        free_sec.extend_from_slice(&END_SENTINEL);

        let preview_sec = padded_section(PREVIEW_SECTION_SIZE);
        let summary_sec = padded_section(SUMMARY_SECTION_SIZE);
        let header_vars_sec = padded_section(HEADER_VARS_SECTION_SIZE);
        let classes_sec = padded_section(CLASSES_SECTION_SIZE);

        // Absolute offsets, in file order.
        let base = (FILE_HEADER_SIZE + DIRECTORY_SIZE) as u32;
        let summary_off = base + preview_sec.len() as u32;
        let header_vars_off = summary_off + summary_sec.len() as u32;
        let classes_off = header_vars_off + header_vars_sec.len() as u32;
        let objects_off = classes_off + classes_sec.len() as u32;
        let handles_off = objects_off + self.objects.len() as u32;
        let free_off = handles_off + handles_sec.len() as u32;

        let directory = encode_directory(&[
            DirectoryEntry::new(
                section_hash::HEADER,
                header_vars_off,
                header_vars_sec.len() as u32,
            ),
            DirectoryEntry::new(section_hash::CLASSES, classes_off, classes_sec.len() as u32),
            DirectoryEntry::new(section_hash::OBJECTS, objects_off, self.objects.len() as u32),
            DirectoryEntry::new(section_hash::HANDLES, handles_off, handles_sec.len() as u32),
            DirectoryEntry::new(section_hash::FREE_SPACE, free_off, free_sec.len() as u32),
            DirectoryEntry::new(section_hash::PREVIEW, base, preview_sec.len() as u32),
            DirectoryEntry::new(
                section_hash::SUMMARY_INFO,
                summary_off,
                summary_sec.len() as u32,
            ),
        ]);

        let header = FileHeader {
            preview_offset: base,
            summary_offset: summary_off,
        };

        let mut out = Vec::with_capacity(target);
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&directory);
        out.extend_from_slice(&preview_sec);
        out.extend_from_slice(&summary_sec);
        out.extend_from_slice(&header_vars_sec);
        out.extend_from_slice(&classes_sec);
        out.extend_from_slice(&self.objects);
        out.extend_from_slice(&handles_sec);
        out.extend_from_slice(&free_sec);

        debug_assert_eq!(out.len(), target);
        Ok(out)
    }

    /// File length if no further entities were appended: fixed prefix,
    /// objects so far plus closing sentinel, handle map so far with
    /// its sentinels, and an empty free-space section.
    fn total_if_closed_now(&self) -> usize {
        FIXED_PREFIX
            + self.objects.len()
            + SENTINEL_SIZE
            + (2 * SENTINEL_SIZE + self.handles_payload)
            + FREE_SECTION_MIN
    }

    fn append_record(&mut self, handle: u32, record: Vec<u8>) {
        let offset = self.objects.len() as u32;
        self.objects.extend_from_slice(&record);
        self.handles_payload += HandleEntry::map_cost(handle);
        self.handle_index.push(HandleEntry { handle, offset });
    }

    fn write_table_objects(&mut self) {
        // Block control: owns the single model-space block record.
        self.append_record(
            handles::BLOCK_CONTROL,
            encode_record(|w| {
                write_bit_short(w, object_type::BLOCK_CONTROL);
                write_bit_short(w, 1);
                write_handle_ref(w, 0);
            }),
        );

        let model_space = model_space_record(0);
        self.model_space_site = (self.objects.len(), model_space.len());
        self.append_record(handles::MODEL_SPACE, model_space);

        self.append_record(
            handles::LAYER_CONTROL,
            encode_record(|w| {
                write_bit_short(w, object_type::LAYER_CONTROL);
                write_bit_short(w, 1);
                write_handle_ref(w, 0);
            }),
        );

        // Layer "0": white, continuous linetype, default plot flags.
        self.append_record(
            handles::LAYER_ZERO,
            encode_record(|w| {
                write_bit_short(w, object_type::LAYER);
                write_text(w, "0");
                write_bit_short(w, 0);
                write_bit_short(w, 7);
                write_handle_ref(w, handles::LTYPE_CONTINUOUS);
                write_bit_short(w, 0);
                write_bit_short(w, 0);
                write_handle_ref(w, handles::LAYER_CONTROL);
                write_handle_ref(w, 0);
                write_handle_ref(w, 0);
            }),
        );

        self.append_record(
            handles::LTYPE_CONTROL,
            encode_record(|w| {
                write_bit_short(w, object_type::LTYPE_CONTROL);
                write_bit_short(w, 1);
                write_handle_ref(w, 0);
            }),
        );

        self.append_record(
            handles::LTYPE_CONTINUOUS,
            encode_record(|w| {
                write_bit_short(w, object_type::LTYPE);
                write_text(w, "Continuous");
                write_bit_double(w, 0.0);
                write_bit_short(w, 0);
                write_text(w, "Solid");
                write_handle_ref(w, handles::LTYPE_CONTROL);
                write_handle_ref(w, 0);
                write_handle_ref(w, 0);
            }),
        );
    }

    /// Greedy fill: append LINE/CIRCLE records while the hypothetical
    /// closed file still fits the budget. Produces the maximum entity
    /// count for the target, so the count is non-decreasing in it.
    fn fill_with_entities(&mut self, rng: &mut impl Rng) {
        while self.entity_count < u16::MAX {
            let handle = self.next_entity_handle;
            let record = entity_record(rng);
            let hypothetical = self.total_if_closed_now()
                + record.len()
                + HandleEntry::map_cost(handle);
            if hypothetical > self.target {
                break;
            }
            self.append_record(handle, record);
            self.next_entity_handle += 1;
            self.entity_count += 1;
        }
    }

    /// Overwrite the model-space record in place with the true entity
    /// count. The count field is stored in the wide form, so the
    /// re-encoded record must come out the same length.
    fn patch_owned_count(&mut self) -> Result<(), WriteError> {
        let (offset, original_len) = self.model_space_site;
        let patched = model_space_record(self.entity_count);
        if patched.len() != original_len {
            return Err(WriteError::RetroactivePatch {
                original: original_len,
                patched: patched.len(),
            });
        }
        self.objects[offset..offset + original_len].copy_from_slice(&patched);
        Ok(())
    }
}

/// Sentinel-bracketed section zero-padded to a fixed total size.
fn padded_section(total: usize) -> Vec<u8> {
    debug_assert!(total >= 2 * SENTINEL_SIZE);
    let mut sec = Vec::with_capacity(total);
    sec.extend_from_slice(&START_SENTINEL);
    sec.resize(total - SENTINEL_SIZE, 0);
    sec.extend_from_slice(&END_SENTINEL);
    sec
}

/// Wrap a record body with the 2-byte length field and the 2-byte
/// checksum placeholder, then patch the length in place. The length
/// excludes both placeholders and the patch never changes the record's
/// total size.
fn encode_record(body: impl FnOnce(&mut BitWriter)) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.extend_from_slice(&[0, 0]);
    body(&mut w);
    w.byte_align();
    w.extend_from_slice(&[0, 0]);
    let mut buf = w.finish();
    let len = (buf.len() - 4) as u16;
    buf[0..2].copy_from_slice(&len.to_le_bytes());
    buf
}

/// The model-space block record. The owned-object count is the one
/// field patched after the greedy fill.
fn model_space_record(owned_count: u16) -> Vec<u8> {
    encode_record(|w| {
        write_bit_short(w, object_type::BLOCK_RECORD);
        write_text(w, "*Model_Space");
        write_bit_short(w, 0);
        write_bit_short_full(w, owned_count);
        write_handle_ref(w, handles::BLOCK_CONTROL);
        write_handle_ref(w, 0);
        write_handle_ref(w, 0);
    })
}

/// One random LINE or CIRCLE entity owned by model space.
fn entity_record(rng: &mut impl Rng) -> Vec<u8> {
    let is_line = rng.random_bool(0.5);
    encode_record(|w| {
        if is_line {
            write_bit_short(w, object_type::LINE);
            write_handle_ref(w, handles::LAYER_ZERO);
            // Start point, end point, thickness, extrusion.
            for _ in 0..2 {
                write_bit_double(w, rng.random_range(-1000..1000) as f64);
                write_bit_double(w, rng.random_range(-1000..1000) as f64);
                write_bit_double(w, 0.0);
            }
            write_bit_double(w, 0.0);
            write_bit_double(w, 0.0);
            write_bit_double(w, 0.0);
            write_bit_double(w, 1.0);
        } else {
            write_bit_short(w, object_type::CIRCLE);
            write_handle_ref(w, handles::LAYER_ZERO);
            // Center, radius, thickness, extrusion.
            write_bit_double(w, rng.random_range(-1000..1000) as f64);
            write_bit_double(w, rng.random_range(-1000..1000) as f64);
            write_bit_double(w, 0.0);
            write_bit_double(w, rng.random_range(1..=500) as f64);
            write_bit_double(w, 0.0);
            write_bit_double(w, 0.0);
            write_bit_double(w, 0.0);
            write_bit_double(w, 1.0);
        }
        write_handle_ref(w, handles::MODEL_SPACE);
        write_handle_ref(w, 0);
        write_handle_ref(w, 0);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_size_builds_exactly() {
        let min = DrawingBuilder::minimum_size();
        let mut rng = rand::rng();
        let bytes = DrawingBuilder::new(min).unwrap().build(&mut rng).unwrap();
        assert_eq!(bytes.len() as u64, min);
    }

    #[test]
    fn below_minimum_is_rejected_with_required_size() {
        let min = DrawingBuilder::minimum_size();
        match DrawingBuilder::new(min - 1) {
            Err(WriteError::SizeTooSmall { required, .. }) => assert_eq!(required, min),
            other => panic!("expected SizeTooSmall, got {other:?}"),
        }
    }

    #[test]
    fn exact_length_for_various_targets() {
        let mut rng = rand::rng();
        for target in [5000u64, 8192, 100_000] {
            let bytes = DrawingBuilder::new(target)
                .unwrap()
                .build(&mut rng)
                .unwrap();
            assert_eq!(bytes.len() as u64, target, "target {target}");
        }
    }

    #[test]
    fn record_length_field_excludes_placeholders() {
        let record = model_space_record(0);
        let declared = u16::from_le_bytes([record[0], record[1]]) as usize;
        assert_eq!(declared, record.len() - 4);
    }

    #[test]
    fn owned_count_patch_is_size_stable() {
        assert_eq!(model_space_record(0).len(), model_space_record(9999).len());
    }
}
