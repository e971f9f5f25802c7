//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::classify::ERROR_LEVEL;
use crate::factor::{Factor, FactorGroup};
use crate::range::BUILTIN_CONFIGURATIONS;
use crate::resolver::ClassificationResult;
use crate::vector::Vector;
use serde::Serialize;

/// Everything shown for one assessment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AssessmentReport {
    pub configuration: String,
    pub vector: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AssessmentReport {
    pub fn new(configuration: &str, vector: &Vector, result: ClassificationResult) -> Self {
        AssessmentReport {
            configuration: configuration.to_string(),
            vector: vector.to_wrapped_string(),
            result,
            share_url: None,
            warnings: Vec::new(),
        }
    }
}

/// Render a report as text output
pub fn render_text(report: &AssessmentReport) -> String {
    let result = &report.result;
    let mut output = String::new();

    output.push_str(&format!("Configuration: {}\n", report.configuration));
    output.push_str(&format!("Vector:        {}\n", report.vector));
    output.push('\n');
    output.push_str(&format!("{:<12} {:<8} {}\n", "AXIS", "SCORE", "LEVEL"));
    output.push_str(&format!(
        "{:<12} {:<8} {}\n",
        "Likelihood",
        format!("{:.3}", result.likelihood_score),
        result.likelihood_level
    ));
    output.push_str(&format!(
        "{:<12} {:<8} {}\n",
        "Impact",
        format!("{:.3}", result.impact_score),
        result.impact_level
    ));
    output.push('\n');

    if result.final_verdict == ERROR_LEVEL {
        output.push_str("Risk:          ERROR (classification could not be resolved)\n");
    } else {
        output.push_str(&format!("Risk:          {}\n", result.final_verdict));
    }

    if let Some(url) = &report.share_url {
        output.push_str(&format!("Share:         {}\n", url));
    }
    for warning in &report.warnings {
        output.push_str(&format!("warning: {}\n", warning));
    }

    output
}

/// Render a report as JSON output
pub fn render_json(report: &AssessmentReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Table of the built-in threshold sets
pub fn render_configurations() -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {}\n",
        "CONFIGURATION", "THRESHOLDS (both axes)"
    ));
    for builtin in BUILTIN_CONFIGURATIONS {
        output.push_str(&format!("{:<24} {}\n", builtin.name, builtin.ranges()));
    }
    output
}

/// Factor catalogue grouped as in the methodology
pub fn render_factors() -> String {
    let mut output = String::new();
    let mut current: Option<FactorGroup> = None;

    for factor in Factor::ALL {
        let group = factor.group();
        if current != Some(group) {
            if current.is_some() {
                output.push('\n');
            }
            output.push_str(&format!("{}\n", group.as_str()));
            current = Some(group);
        }
        output.push_str(&format!(
            "  {:<4} {}\n",
            factor.key().to_uppercase(),
            factor.name()
        ));
        for option in factor.options() {
            output.push_str(&format!("         {}  {}\n", option.value, option.description));
        }
    }

    output
}
