//! Exact-size placeholder file synthesis.
//!
//! Given a target byte count and an output path, the crate writes a
//! structurally valid file in the format implied by the path's
//! extension, sized to the byte. Self-describing formats (PNG, JPEG,
//! ZIP, MP4, DWG, PDF) get their internal length fields, checksums and
//! directories reconciled with the target; text formats are padded
//! with valid content.
//!
//! The layering follows a ports-and-adapters shape: `domain` holds the
//! size/type vocabulary and error taxonomy, `application` the
//! generator port, registry and file service, `engine` the shared
//! sizing machinery, and `infrastructure` the per-format generators.

pub mod application;
pub mod domain;
pub mod engine;
pub mod infrastructure;

pub use application::file_service::FileService;
pub use application::registry::GeneratorRegistry;
pub use domain::errors::GenError;
pub use domain::file_type::FileType;
pub use domain::size::parse_size;
