use rand::RngCore;

use crate::domain::errors::GenError;

/// A format-specific generator. Implementations return the complete
/// file contents, sized to exactly `target_bytes`, or an error when
/// the target is unreachable for the format.
pub trait FileGenerator: Send + Sync {
    fn generate(&self, target_bytes: u64, rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError>;
}
