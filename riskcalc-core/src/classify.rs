//! Score to level classification
//!
//! Ranges are half-open `[min, max)` and tried in ascending-min order, so an
//! overlap resolves to the lowest range. The only closed bound is the top of
//! the scale: a score of exactly 9 also matches a range whose max is 9.
//! Interior boundaries stay half-open.

use crate::range::RangeConfig;
use crate::vector::SCALE_MAX;

/// In-band marker for a score or level pair that cannot be resolved
pub const ERROR_LEVEL: &str = "ERROR";

/// Classify a score, returning [`ERROR_LEVEL`] when no range matches
///
/// Unreachable for configurations that pass
/// [`crate::range::validate_continuous`].
pub fn classify(score: f64, config: &RangeConfig) -> String {
    config
        .sorted()
        .into_iter()
        .find(|range| {
            (score >= range.min && score < range.max)
                || (score == SCALE_MAX && range.max == SCALE_MAX)
        })
        .map(|range| range.label.clone())
        .unwrap_or_else(|| ERROR_LEVEL.to_string())
}

/// Whether a level or verdict is the error sentinel
pub fn is_error(value: &str) -> bool {
    value == ERROR_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::NamedConfiguration;

    fn default_ranges() -> RangeConfig {
        NamedConfiguration::default_configuration().ranges()
    }

    #[test]
    fn test_default_boundaries() {
        let config = default_ranges();
        assert_eq!(classify(0.0, &config), "LOW");
        assert_eq!(classify(2.999, &config), "LOW");
        assert_eq!(classify(3.0, &config), "MEDIUM");
        assert_eq!(classify(5.875, &config), "MEDIUM");
        assert_eq!(classify(6.0, &config), "HIGH");
        assert_eq!(classify(9.0, &config), "HIGH");
    }

    #[test]
    fn test_top_of_scale_closes_only_the_last_range() {
        // MEDIUM ends at 6 and HIGH starts at 6: 6 belongs to HIGH, not MEDIUM
        let config = RangeConfig::parse("LOW:0-3;MEDIUM:3-6;HIGH:6-9").unwrap();
        assert_eq!(classify(6.0, &config), "HIGH");

        // A range ending at 9 that is not last by min still takes a score of 9
        // when it sorts first among the matches
        let config = RangeConfig::parse("WIDE:0-9;TOP:9-9").unwrap();
        assert_eq!(classify(9.0, &config), "WIDE");
    }

    #[test]
    fn test_interior_boundary_gap_is_unresolved() {
        // Touching bounds are half-open: nothing claims 3 when the next range starts at 4
        let config = RangeConfig::parse("LOW:0-3;MEDIUM:4-6;HIGH:6-9").unwrap();
        assert_eq!(classify(3.0, &config), ERROR_LEVEL);
        assert_eq!(classify(3.5, &config), ERROR_LEVEL);
        assert_eq!(classify(4.0, &config), "MEDIUM");
    }

    #[test]
    fn test_top_not_covered_is_unresolved() {
        let config = RangeConfig::parse("LOW:0-4;HIGH:4-8").unwrap();
        assert_eq!(classify(9.0, &config), ERROR_LEVEL);
        assert!(is_error(&classify(8.0, &config)));
    }

    #[test]
    fn test_overlap_resolves_to_lowest_min() {
        let config = RangeConfig::parse("MEDIUM:2-6;LOW:0-4;HIGH:6-9").unwrap();
        assert_eq!(classify(3.0, &config), "LOW");
        assert_eq!(classify(4.0, &config), "MEDIUM");
    }
}
