//! Unit-count planning against an exact byte target.
//!
//! The planner starts from the cost model's estimate and walks the
//! count downward, re-measuring the real serializer each step, until
//! the measured size fits the target and leaves a remainder the
//! format's padding mechanism can actually express. It never returns a
//! count that overshoots.

use crate::domain::errors::GenError;
use crate::engine::cost_model::CostModel;

/// A committed plan: the chosen unit count and the padding bytes still
/// needed to land exactly on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub units: u64,
    pub padding_needed: u64,
}

/// Pick the largest unit count whose measured size does not exceed
/// `target` and whose remainder is zero or at least
/// `min_padding_block`.
pub fn plan_unit_count<F>(
    target: u64,
    model: &CostModel,
    min_padding_block: u64,
    mut measure: F,
) -> Result<Plan, GenError>
where
    F: FnMut(u64) -> Result<u64, GenError>,
{
    let mut units = model.units_for(target);
    loop {
        let actual = measure(units)?;
        if actual <= target {
            let padding_needed = target - actual;
            if padding_needed == 0 || padding_needed >= min_padding_block {
                return Ok(Plan {
                    units,
                    padding_needed,
                });
            }
        }
        if units == 0 {
            // Even the empty serialization cannot be padded up to the
            // target, so report the smallest reachable size.
            let minimum = if actual > target {
                actual
            } else {
                actual + min_padding_block
            };
            return Err(GenError::SizeTooSmall { target, minimum });
        }
        units -= 1;
    }
}

/// Iterate a length parameter until the rendered size matches the
/// target exactly. Used by formats whose internal length fields feed
/// back into the total size (digit widths shifting offsets).
pub fn fixed_point<F>(
    target: u64,
    initial: u64,
    max_iterations: u32,
    mut render_len: F,
) -> Result<u64, GenError>
where
    F: FnMut(u64) -> Result<u64, GenError>,
{
    let mut param = initial as i64;
    for _ in 0..max_iterations {
        if param < 0 {
            break;
        }
        let total = render_len(param as u64)?;
        if total == target {
            return Ok(param as u64);
        }
        param += target as i64 - total as i64;
    }
    Err(GenError::ConvergenceFailure {
        iterations: max_iterations,
    })
}
