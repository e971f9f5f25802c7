//! Risk resolution: vector + configuration -> verdict
//!
//! A resolver runs in one of two modes. Named mode uses a built-in threshold
//! set on both axes with the default OWASP mapping. Custom mode uses caller
//! supplied ranges for each axis and an explicit mapping; it is only entered
//! when all three parts are present and consistent.
//!
//! Resolution is straight-line: scores, then one classification per axis,
//! then the mapping lookup. An unresolvable level or pair yields the
//! `"ERROR"` sentinel as the verdict instead of failing the call.

use crate::classify::{classify, is_error};
use crate::error::{Axis, Result, RiskError};
use crate::mapping::MappingTable;
use crate::query::{IMPACT_CONFIG_PARAM, LIKELIHOOD_CONFIG_PARAM, MAPPING_PARAM};
use crate::range::{NamedConfiguration, RangeConfig, DEFAULT_CONFIGURATION};
use crate::score::{impact_score, likelihood_score};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// Display name for custom configurations
pub const CUSTOM_CONFIGURATION: &str = "Custom Configuration";

/// Outcome of one resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClassificationResult {
    pub likelihood_score: f64,
    pub impact_score: f64,
    pub likelihood_level: String,
    pub impact_level: String,
    pub final_verdict: String,
}

impl ClassificationResult {
    /// False when the verdict is the `"ERROR"` sentinel
    pub fn is_resolved(&self) -> bool {
        !is_error(&self.final_verdict)
    }
}

/// Complete custom configuration: ranges for both axes plus a mapping
#[derive(Debug, Clone, PartialEq)]
pub struct CustomConfiguration {
    likelihood: RangeConfig,
    impact: RangeConfig,
    mapping: MappingTable,
}

impl CustomConfiguration {
    /// Assemble from parsed parts, checking coverage and mapping shape
    pub fn new(likelihood: RangeConfig, impact: RangeConfig, mapping: MappingTable) -> Result<Self> {
        if !likelihood.is_continuous() {
            return Err(RiskError::RangeCoverage {
                axis: Axis::Likelihood,
            });
        }
        if !impact.is_continuous() {
            return Err(RiskError::RangeCoverage { axis: Axis::Impact });
        }
        if mapping.likelihood_levels() != likelihood.sorted_levels().as_slice()
            || mapping.impact_levels() != impact.sorted_levels().as_slice()
        {
            return Err(RiskError::format(
                "mapping levels do not match the configured ranges",
            ));
        }
        Ok(CustomConfiguration {
            likelihood,
            impact,
            mapping,
        })
    }

    /// Parse all three texts
    pub fn parse(likelihood: &str, impact: &str, mapping: &str) -> Result<Self> {
        let likelihood = RangeConfig::parse_continuous(likelihood, Axis::Likelihood)?;
        let impact = RangeConfig::parse_continuous(impact, Axis::Impact)?;
        let mapping = MappingTable::parse_for(&likelihood, &impact, mapping)?;
        CustomConfiguration::new(likelihood, impact, mapping)
    }

    /// Build from optional parts
    ///
    /// All absent is `Ok(None)` (use a named configuration). Some but not all
    /// present is [`RiskError::MissingParameter`] naming the absent ones.
    pub fn from_parts(
        likelihood: Option<&str>,
        impact: Option<&str>,
        mapping: Option<&str>,
    ) -> Result<Option<Self>> {
        match (likelihood, impact, mapping) {
            (None, None, None) => Ok(None),
            (Some(l), Some(i), Some(m)) => CustomConfiguration::parse(l, i, m).map(Some),
            _ => {
                let missing = [
                    (LIKELIHOOD_CONFIG_PARAM, likelihood.is_none()),
                    (IMPACT_CONFIG_PARAM, impact.is_none()),
                    (MAPPING_PARAM, mapping.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name.to_string())
                .collect();
                Err(RiskError::MissingParameter { missing })
            }
        }
    }

    pub fn likelihood(&self) -> &RangeConfig {
        &self.likelihood
    }

    pub fn impact(&self) -> &RangeConfig {
        &self.impact
    }

    pub fn mapping(&self) -> &MappingTable {
        &self.mapping
    }
}

/// Which configuration a resolution uses
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Built-in by name; unknown names resolve as the default configuration
    Named(String),
    Custom(CustomConfiguration),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Named(DEFAULT_CONFIGURATION.to_string())
    }
}

impl Selection {
    pub fn named(name: impl Into<String>) -> Self {
        Selection::Named(name.into())
    }

    /// Name of the configuration actually applied
    pub fn display_name(&self) -> &str {
        match self {
            Selection::Named(name) => NamedConfiguration::find_or_default(name).name,
            Selection::Custom(_) => CUSTOM_CONFIGURATION,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Selection::Custom(_))
    }
}

/// Resolves vectors against one configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RiskResolver {
    likelihood: RangeConfig,
    impact: RangeConfig,
    mapping: MappingTable,
}

impl RiskResolver {
    pub fn new(selection: &Selection) -> Self {
        match selection {
            Selection::Named(name) => {
                let builtin = NamedConfiguration::find_or_default(name);
                RiskResolver {
                    likelihood: builtin.ranges(),
                    impact: builtin.ranges(),
                    mapping: MappingTable::owasp_default(),
                }
            }
            Selection::Custom(custom) => RiskResolver {
                likelihood: custom.likelihood.clone(),
                impact: custom.impact.clone(),
                mapping: custom.mapping.clone(),
            },
        }
    }

    /// Choose custom mode when all three parts are given, named mode when none are
    pub fn from_parts(
        name: &str,
        likelihood: Option<&str>,
        impact: Option<&str>,
        mapping: Option<&str>,
    ) -> Result<Self> {
        let selection = match CustomConfiguration::from_parts(likelihood, impact, mapping)? {
            Some(custom) => Selection::Custom(custom),
            None => Selection::named(name),
        };
        Ok(RiskResolver::new(&selection))
    }

    pub fn resolve(&self, vector: &Vector) -> ClassificationResult {
        let likelihood_score = likelihood_score(vector);
        let impact_score = impact_score(vector);
        let likelihood_level = classify(likelihood_score, &self.likelihood);
        let impact_level = classify(impact_score, &self.impact);
        let final_verdict = self.mapping.lookup(&likelihood_level, &impact_level);

        ClassificationResult {
            likelihood_score,
            impact_score,
            likelihood_level,
            impact_level,
            final_verdict,
        }
    }
}

/// Resolve a vector with the given configuration
pub fn resolve(vector: &Vector, selection: &Selection) -> ClassificationResult {
    RiskResolver::new(selection).resolve(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ERROR_LEVEL;
    use crate::factor::Factor;

    const OWASP_MAPPING: &str = "NOTE,LOW,MEDIUM,LOW,MEDIUM,HIGH,MEDIUM,HIGH,CRITICAL";
    const DEFAULT_RANGES: &str = "LOW:0-3;MEDIUM:3-6;HIGH:6-9";

    #[test]
    fn test_named_default_note() {
        let v = Vector::parse(
            "(sl:1/m:1/o:0/s:2/ed:0/ee:0/a:0/id:0/lc:0/li:0/lav:0/lac:0/fd:0/rd:0/nc:0/pv:0)",
        )
        .unwrap();
        let result = resolve(&v, &Selection::default());
        assert_eq!(result.likelihood_score, 0.5);
        assert_eq!(result.impact_score, 0.0);
        assert_eq!(result.likelihood_level, "LOW");
        assert_eq!(result.impact_level, "LOW");
        assert_eq!(result.final_verdict, "NOTE");
    }

    #[test]
    fn test_named_configuration_changes_thresholds() {
        // likelihood 4 is MEDIUM by default but LOW under Configuration 1
        let mut v = Vector::zero();
        for f in Factor::LIKELIHOOD {
            v.set(f, 4.0);
        }
        v.set(Factor::FinancialDamage, 7.0);
        let default = resolve(&v, &Selection::default());
        assert_eq!(default.likelihood_level, "MEDIUM");
        assert_eq!(default.final_verdict, "HIGH");

        let config1 = resolve(&v, &Selection::named("Configuration 1"));
        assert_eq!(config1.likelihood_level, "LOW");
        assert_eq!(config1.final_verdict, "MEDIUM");
    }

    #[test]
    fn test_unknown_name_behaves_as_default() {
        let v = Vector::zero().with(Factor::Motive, 9.0).with(Factor::LossOfIntegrity, 4.0);
        assert_eq!(
            resolve(&v, &Selection::named("Nope")),
            resolve(&v, &Selection::default())
        );
        assert_eq!(Selection::named("Nope").display_name(), DEFAULT_CONFIGURATION);
    }

    #[test]
    fn test_from_parts_missing_mapping() {
        let err = CustomConfiguration::from_parts(Some(DEFAULT_RANGES), Some(DEFAULT_RANGES), None)
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::MissingParameter {
                missing: vec!["mapping".to_string()]
            }
        );
    }

    #[test]
    fn test_from_parts_missing_two() {
        let err = CustomConfiguration::from_parts(None, None, Some(OWASP_MAPPING)).unwrap_err();
        assert_eq!(
            err,
            RiskError::MissingParameter {
                missing: vec!["likelihoodConfig".to_string(), "impactConfig".to_string()]
            }
        );
    }

    #[test]
    fn test_from_parts_none_is_named_mode() {
        assert!(CustomConfiguration::from_parts(None, None, None).unwrap().is_none());
        let resolver = RiskResolver::from_parts("Configuration 2", None, None, None).unwrap();
        assert_eq!(resolver, RiskResolver::new(&Selection::named("Configuration 2")));
    }

    #[test]
    fn test_custom_gap_is_coverage_error() {
        let err = CustomConfiguration::from_parts(
            Some(DEFAULT_RANGES),
            Some("LOW:0-3;MEDIUM:4-6;HIGH:6-9"),
            Some(OWASP_MAPPING),
        )
        .unwrap_err();
        assert_eq!(err, RiskError::RangeCoverage { axis: Axis::Impact });
    }

    #[test]
    fn test_custom_two_level_impact() {
        let custom = CustomConfiguration::parse(
            DEFAULT_RANGES,
            "MINOR:0-5;MAJOR:5-9",
            "NOTE,LOW,LOW,HIGH,HIGH,CRITICAL",
        )
        .unwrap();
        let v = Vector::zero()
            .with(Factor::SkillLevel, 9.0)
            .with(Factor::Motive, 9.0)
            .with(Factor::Opportunity, 9.0)
            .with(Factor::LossOfConfidentiality, 6.0);
        // likelihood 27/8 = 3.375 -> MEDIUM, impact 6 -> MAJOR
        let result = resolve(&v, &Selection::Custom(custom));
        assert_eq!(result.likelihood_level, "MEDIUM");
        assert_eq!(result.impact_level, "MAJOR");
        assert_eq!(result.final_verdict, "HIGH");
    }

    #[test]
    fn test_mapping_for_other_levels_rejected() {
        let likelihood = RangeConfig::parse(DEFAULT_RANGES).unwrap();
        let impact = RangeConfig::parse("MINOR:0-5;MAJOR:5-9").unwrap();
        let err = CustomConfiguration::new(likelihood, impact, MappingTable::owasp_default())
            .unwrap_err();
        assert!(matches!(err, RiskError::Format(_)));
    }

    #[test]
    fn test_sentinel_reaches_verdict_for_unvalidated_ranges() {
        // Bypass CustomConfiguration validation: resolver built from raw parts
        let resolver = RiskResolver {
            likelihood: RangeConfig::parse("LOW:0-3;HIGH:4-9").unwrap(),
            impact: RangeConfig::parse("LOW:0-9").unwrap(),
            mapping: MappingTable::parse(&["LOW", "HIGH"], &["LOW"], "NOTE,HIGH").unwrap(),
        };
        let mut v = Vector::zero();
        for f in Factor::LIKELIHOOD {
            v.set(f, 3.5);
        }
        let result = resolver.resolve(&v);
        assert_eq!(result.likelihood_level, ERROR_LEVEL);
        assert_eq!(result.final_verdict, ERROR_LEVEL);
        assert!(!result.is_resolved());
    }

    #[test]
    fn test_dashed_labels_resolve_their_own_verdict() {
        let custom = CustomConfiguration::parse("A:0-3;A-B:3-9", "B-C:0-5;C:5-9", "W,X,Y,Z").unwrap();
        let result = resolve(&Vector::zero(), &Selection::Custom(custom));
        assert_eq!(result.likelihood_level, "A");
        assert_eq!(result.impact_level, "B-C");
        assert_eq!(result.final_verdict, "W");
    }
}
