// SPDX-License-Identifier: MIT
//! Minimal R2018-style DWG container, written directly at the bit level.
//!
//! The crate builds a structurally valid drawing file of an exact byte
//! length: a 128-byte file header, a 108-byte XOR-masked section
//! directory, and a run of sentinel-bracketed sections (preview,
//! summary, header variables, classes, objects, handle map, free
//! space). Entity records are bit-packed with the format's
//! variable-width integer/float encodings, and the free-space section
//! absorbs whatever remains of the byte budget.
//!
//! # Example
//!
//! ```
//! use dwg_container::DrawingBuilder;
//!
//! let mut rng = rand::rng();
//! let bytes = DrawingBuilder::new(5000).unwrap().build(&mut rng).unwrap();
//! assert_eq!(bytes.len(), 5000);
//! ```

pub mod bits;
pub mod codec;
pub mod format;
pub mod reader;
pub mod writer;

pub use bits::BitWriter;
pub use reader::{Drawing, ReadError};
pub use writer::{DrawingBuilder, WriteError};
