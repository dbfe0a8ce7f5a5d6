//! DWG generator: delegates to the bit-level container writer, which
//! greedily fills the byte budget with random entities and closes the
//! exact remainder with its free-space section.

use dwg_container::DrawingBuilder;
use rand::RngCore;

use crate::application::ports::FileGenerator;
use crate::domain::errors::GenError;

pub struct DwgGenerator;

impl FileGenerator for DwgGenerator {
    fn generate(&self, target_bytes: u64, mut rng: &mut dyn RngCore) -> Result<Vec<u8>, GenError> {
        let bytes = DrawingBuilder::new(target_bytes)?.build(&mut rng)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwg_container::Drawing;

    #[test]
    fn produces_a_parsable_drawing_of_exact_size() {
        let mut rng = rand::rng();
        let bytes = DwgGenerator.generate(30_000, &mut rng).unwrap();
        assert_eq!(bytes.len(), 30_000);
        let drawing = Drawing::parse(&bytes).unwrap();
        assert!(drawing.entity_count > 0);
    }

    #[test]
    fn below_container_minimum_maps_to_size_error() {
        let mut rng = rand::rng();
        assert!(matches!(
            DwgGenerator.generate(500, &mut rng),
            Err(GenError::SizeTooSmall { .. })
        ));
    }
}
