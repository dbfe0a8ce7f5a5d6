//! Human-readable size specifications.
//!
//! Accepted forms: a bare byte count (`1048576`) or an integer with a
//! binary unit suffix (`512K`, `2MB`). Units are powers of 1024,
//! case-insensitive; decimal fractions are not accepted.

use crate::domain::errors::GenError;

/// Parse a size specification into a byte count.
pub fn parse_size(spec: &str) -> Result<u64, GenError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(GenError::InvalidSizeSpec(spec.to_string()));
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let value: u64 = number
        .parse()
        .map_err(|_| GenError::InvalidSizeSpec(spec.to_string()))?;

    let multiplier: u64 = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" => 1024,
        "M" | "MB" => 1024 * 1024,
        "G" | "GB" => 1024 * 1024 * 1024,
        _ => return Err(GenError::InvalidSizeSpec(spec.to_string())),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| GenError::InvalidSizeSpec(spec.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_is_bytes() {
        assert_eq!(parse_size("1234").unwrap(), 1234);
    }

    #[test]
    fn binary_units() {
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("2KB").unwrap(), 2048);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
    }

    #[test]
    fn units_are_case_insensitive() {
        assert_eq!(parse_size("1k").unwrap(), 1024);
        assert_eq!(parse_size("3mb").unwrap(), 3 * 1024 * 1024);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_size("  10 MB ").unwrap(), 10 * 1024 * 1024);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "10X", "-5K", "1.5M", "99999999999999999999G"] {
            assert!(parse_size(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
