//! Threshold ranges that turn a 0-9 score into a named level
//!
//! Text form: `LOW:0-3;MEDIUM:3-6;HIGH:6-9`. Labels are stored upper-cased.
//!
//! Global invariants enforced:
//! - Every bound lies in [0, 9] and min <= max
//! - Labels are unique within a configuration
//! - Built-in configurations are constants and never mutated

use crate::error::{Axis, Result, RiskError};
use crate::vector::{parse_number, SCALE_MAX, SCALE_MIN};
use serde::Serialize;
use std::cmp::Ordering;

/// One named level and the score interval it covers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelRange {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

impl LevelRange {
    pub fn new(label: &str, min: f64, max: f64) -> Self {
        LevelRange {
            label: label.trim().to_uppercase(),
            min,
            max,
        }
    }
}

/// Ordered set of level ranges for one axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeConfig {
    ranges: Vec<LevelRange>,
}

impl RangeConfig {
    /// Build from ranges, checking labels and bounds (not continuity)
    pub fn new(ranges: Vec<LevelRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(RiskError::format("range configuration has no ranges"));
        }
        for (i, range) in ranges.iter().enumerate() {
            if range.label.is_empty() {
                return Err(RiskError::format("range is missing a label"));
            }
            if ranges[..i].iter().any(|r| r.label == range.label) {
                return Err(RiskError::format(format!(
                    "duplicate range label: {}",
                    range.label
                )));
            }
            for bound in [range.min, range.max] {
                if !(SCALE_MIN..=SCALE_MAX).contains(&bound) {
                    return Err(RiskError::format(format!(
                        "bounds of {} must be between 0 and 9 (got {})",
                        range.label, bound
                    )));
                }
            }
            if range.min > range.max {
                return Err(RiskError::format(format!(
                    "range {} has min {} greater than max {}",
                    range.label, range.min, range.max
                )));
            }
        }
        Ok(RangeConfig { ranges })
    }

    /// Parse `LABEL:min-max;LABEL:min-max` text
    ///
    /// Empty segments (e.g. from a trailing `;`) are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut ranges = Vec::new();
        for segment in text.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            ranges.push(parse_segment(segment)?);
        }
        RangeConfig::new(ranges)
    }

    /// Parse and require continuous 0-9 coverage
    pub fn parse_continuous(text: &str, axis: Axis) -> Result<Self> {
        let config = RangeConfig::parse(text)?;
        if !config.is_continuous() {
            return Err(RiskError::RangeCoverage { axis });
        }
        Ok(config)
    }

    /// Ranges in the order they were given
    pub fn ranges(&self) -> &[LevelRange] {
        &self.ranges
    }

    /// Ranges by ascending min; ties keep their original order
    pub fn sorted(&self) -> Vec<&LevelRange> {
        let mut sorted: Vec<&LevelRange> = self.ranges.iter().collect();
        sorted.sort_by(|a, b| a.min.partial_cmp(&b.min).unwrap_or(Ordering::Equal));
        sorted
    }

    /// Labels by ascending min: the row/column order of a mapping table
    pub fn sorted_levels(&self) -> Vec<String> {
        self.sorted().into_iter().map(|r| r.label.clone()).collect()
    }

    pub fn is_continuous(&self) -> bool {
        validate_continuous(self)
    }

    /// Serialize in the original order
    pub fn to_text(&self) -> String {
        self.ranges
            .iter()
            .map(|r| format!("{}:{}-{}", r.label, r.min, r.max))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl std::str::FromStr for RangeConfig {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        RangeConfig::parse(s)
    }
}

impl std::fmt::Display for RangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn parse_segment(segment: &str) -> Result<LevelRange> {
    let (label, bounds) = segment
        .split_once(':')
        .ok_or_else(|| RiskError::format(format!("range '{}' is missing ':'", segment)))?;
    if label.trim().is_empty() {
        return Err(RiskError::format(format!(
            "range '{}' is missing a label",
            segment
        )));
    }
    let (min, max) = bounds.split_once('-').ok_or_else(|| {
        RiskError::format(format!("range '{}' is missing a min-max range", segment))
    })?;
    let min = parse_number(min)
        .ok_or_else(|| RiskError::format(format!("invalid min in range '{}'", segment)))?;
    let max = parse_number(max)
        .ok_or_else(|| RiskError::format(format!("invalid max in range '{}'", segment)))?;
    Ok(LevelRange::new(label, min, max))
}

/// Check the ranges cover [0, 9] with no gap
///
/// Sorted by min: the first starts at 0, the last ends at 9 and each range
/// ends at or after the next one starts. Overlap is allowed.
pub fn validate_continuous(config: &RangeConfig) -> bool {
    let sorted = config.sorted();
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return false;
    };
    if first.min != SCALE_MIN || last.max != SCALE_MAX {
        return false;
    }
    sorted.windows(2).all(|pair| pair[0].max >= pair[1].min)
}

/// Name of the configuration used when none (or an unknown one) is chosen
pub const DEFAULT_CONFIGURATION: &str = "Default Configuration";

/// A built-in threshold set, applied to both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedConfiguration {
    pub name: &'static str,
    thresholds: [(&'static str, f64, f64); 3],
}

/// Built-in configurations, default first
pub const BUILTIN_CONFIGURATIONS: [NamedConfiguration; 4] = [
    NamedConfiguration {
        name: DEFAULT_CONFIGURATION,
        thresholds: [("LOW", 0.0, 3.0), ("MEDIUM", 3.0, 6.0), ("HIGH", 6.0, 9.0)],
    },
    NamedConfiguration {
        name: "Configuration 1",
        thresholds: [("LOW", 0.0, 5.0), ("MEDIUM", 5.0, 6.0), ("HIGH", 6.0, 9.0)],
    },
    NamedConfiguration {
        name: "Configuration 2",
        thresholds: [("LOW", 0.0, 7.0), ("MEDIUM", 7.0, 8.0), ("HIGH", 8.0, 9.0)],
    },
    NamedConfiguration {
        name: "Configuration 3",
        thresholds: [("LOW", 0.0, 5.0), ("MEDIUM", 5.0, 8.0), ("HIGH", 8.0, 9.0)],
    },
];

impl NamedConfiguration {
    /// Find a built-in by name (trimmed, ASCII case-insensitive)
    pub fn find(name: &str) -> Option<&'static NamedConfiguration> {
        BUILTIN_CONFIGURATIONS
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Find a built-in by name, falling back to the default configuration
    pub fn find_or_default(name: &str) -> &'static NamedConfiguration {
        NamedConfiguration::find(name).unwrap_or_else(|| {
            tracing::debug!(name, "unknown configuration, using {}", DEFAULT_CONFIGURATION);
            NamedConfiguration::default_configuration()
        })
    }

    pub fn default_configuration() -> &'static NamedConfiguration {
        &BUILTIN_CONFIGURATIONS[0]
    }

    /// Threshold ranges of this configuration
    pub fn ranges(&self) -> RangeConfig {
        RangeConfig {
            ranges: self
                .thresholds
                .iter()
                .map(|(label, min, max)| LevelRange::new(label, *min, *max))
                .collect(),
        }
    }
}
