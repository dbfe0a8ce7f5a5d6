//! End-to-end file generation: resolve the format from the path,
//! dispatch to the registered generator, verify the exact size, and
//! write the result atomically enough that a failed run leaves no
//! partial file behind.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::registry::GeneratorRegistry;
use crate::domain::errors::GenError;
use crate::domain::file_type::FileType;

pub struct FileService {
    registry: Arc<GeneratorRegistry>,
}

impl FileService {
    pub fn new(registry: Arc<GeneratorRegistry>) -> Self {
        Self { registry }
    }

    /// Generate a file of exactly `target_bytes` at `path`, in the
    /// format implied by the path's extension.
    pub fn generate_file(&self, path: &Path, target_bytes: u64) -> Result<(), GenError> {
        let file_type = FileType::from_path(path)?;
        debug!(?file_type, target_bytes, "resolved output format");

        let generator = self
            .registry
            .get(file_type)
            .ok_or_else(|| GenError::UnsupportedFormat(format!("{file_type:?}")))?;

        let mut rng = rand::rng();
        let bytes = generator.generate(target_bytes, &mut rng)?;

        if bytes.len() as u64 != target_bytes {
            return Err(GenError::Overshoot {
                actual: bytes.len() as u64,
                target: target_bytes,
            });
        }

        if let Err(err) = fs::write(path, &bytes) {
            // An interrupted write can leave a short file; remove it
            // rather than hand the caller a wrong-sized artifact.
            if path.exists() {
                if let Err(cleanup) = fs::remove_file(path) {
                    warn!(%cleanup, "failed to remove partial output");
                }
            }
            return Err(err.into());
        }

        info!(
            path = %path.display(),
            size = target_bytes,
            ?file_type,
            "file generated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> FileService {
        FileService::new(Arc::new(GeneratorRegistry::with_defaults()))
    }

    #[test]
    fn writes_exactly_sized_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        service().generate_file(&path, 1000).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 1000);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wat");
        assert!(matches!(
            service().generate_file(&path, 1000),
            Err(GenError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn failed_generation_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        // Far below the PNG structural minimum.
        assert!(service().generate_file(&path, 10).is_err());
        assert!(!path.exists());
    }
}
