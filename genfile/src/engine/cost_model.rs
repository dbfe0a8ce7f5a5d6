//! Linear cost model for container formats.
//!
//! Serialized size is approximated as `baseline + units * marginal`,
//! with both coefficients measured by probing the real serializer at
//! zero units and at a sample count. The model only seeds the planner;
//! the planner always re-measures before committing to a count.

use crate::domain::errors::GenError;

#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    /// Serialized size with zero content units.
    pub baseline: u64,
    /// Additional bytes per content unit, at least 1.
    pub marginal: u64,
}

impl CostModel {
    /// Probe a serializer at 0 and `sample_units` units.
    pub fn probe<F>(mut measure: F, sample_units: u64) -> Result<Self, GenError>
    where
        F: FnMut(u64) -> Result<u64, GenError>,
    {
        debug_assert!(sample_units > 0);
        let baseline = measure(0)?;
        let at_sample = measure(sample_units)?;
        // A degenerate serializer could report zero growth; a floor of
        // one keeps the division below meaningful.
        let marginal = (at_sample.saturating_sub(baseline) / sample_units).max(1);
        Ok(Self { baseline, marginal })
    }

    /// Estimated unit count that fills `target` without overshooting.
    pub fn units_for(&self, target: u64) -> u64 {
        target.saturating_sub(self.baseline) / self.marginal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_a_linear_serializer() {
        let model = CostModel::probe(|units| Ok(100 + units * 7), 10).unwrap();
        assert_eq!(model.baseline, 100);
        assert_eq!(model.marginal, 7);
        assert_eq!(model.units_for(170), 10);
    }

    #[test]
    fn marginal_is_floored_at_one() {
        let model = CostModel::probe(|_| Ok(50), 10).unwrap();
        assert_eq!(model.marginal, 1);
    }

    #[test]
    fn target_below_baseline_means_zero_units() {
        let model = CostModel::probe(|units| Ok(100 + units), 10).unwrap();
        assert_eq!(model.units_for(40), 0);
    }
}
