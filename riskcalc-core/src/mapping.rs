//! Likelihood x impact lookup table producing the final verdict
//!
//! Text form is a flat comma-separated list of verdicts consumed row-major:
//! likelihood levels (ascending min) outer, impact levels (ascending min)
//! inner.

use crate::classify::ERROR_LEVEL;
use crate::error::{Result, RiskError};
use crate::range::RangeConfig;
use std::collections::HashMap;

/// Levels shared by both axes of the default OWASP table
const OWASP_LEVELS: [&str; 3] = ["LOW", "MEDIUM", "HIGH"];

/// Default OWASP verdicts, row-major over [`OWASP_LEVELS`]
const OWASP_VERDICTS: [&str; 9] = [
    "NOTE", "LOW", "MEDIUM", // LOW likelihood
    "LOW", "MEDIUM", "HIGH", // MEDIUM likelihood
    "MEDIUM", "HIGH", "CRITICAL", // HIGH likelihood
];

/// Verdict lookup keyed by (likelihood level, impact level)
#[derive(Debug, Clone, PartialEq)]
pub struct MappingTable {
    likelihood_levels: Vec<String>,
    impact_levels: Vec<String>,
    entries: HashMap<(String, String), String>,
}

/// Labels may contain `-`, so the pair is never joined into one string
fn entry_key(likelihood: &str, impact: &str) -> (String, String) {
    (likelihood.to_uppercase(), impact.to_uppercase())
}

impl MappingTable {
    /// Parse a flat verdict list against the given level orders
    pub fn parse<L, I>(likelihood_levels: &[L], impact_levels: &[I], text: &str) -> Result<Self>
    where
        L: AsRef<str>,
        I: AsRef<str>,
    {
        let values: Vec<&str> = text.split(',').map(str::trim).collect();
        let expected = likelihood_levels.len() * impact_levels.len();
        if values.len() != expected {
            return Err(RiskError::format(format!(
                "mapping must have {} entries ({}x{}), found {}",
                expected,
                likelihood_levels.len(),
                impact_levels.len(),
                values.len()
            )));
        }
        if let Some(pos) = values.iter().position(|v| v.is_empty()) {
            return Err(RiskError::format(format!(
                "mapping entry {} is empty",
                pos + 1
            )));
        }

        let likelihood_levels: Vec<String> = likelihood_levels
            .iter()
            .map(|l| l.as_ref().to_uppercase())
            .collect();
        let impact_levels: Vec<String> = impact_levels
            .iter()
            .map(|i| i.as_ref().to_uppercase())
            .collect();

        let mut entries = HashMap::with_capacity(expected);
        let mut values = values.into_iter();
        for likelihood in &likelihood_levels {
            for impact in &impact_levels {
                if let Some(value) = values.next() {
                    entries.insert(entry_key(likelihood, impact), value.to_uppercase());
                }
            }
        }

        Ok(MappingTable {
            likelihood_levels,
            impact_levels,
            entries,
        })
    }

    /// Parse using the sorted levels of two range configurations
    pub fn parse_for(likelihood: &RangeConfig, impact: &RangeConfig, text: &str) -> Result<Self> {
        MappingTable::parse(&likelihood.sorted_levels(), &impact.sorted_levels(), text)
    }

    /// The built-in OWASP 3x3 table
    pub fn owasp_default() -> Self {
        let mut entries = HashMap::with_capacity(OWASP_VERDICTS.len());
        let mut verdicts = OWASP_VERDICTS.iter();
        for likelihood in OWASP_LEVELS {
            for impact in OWASP_LEVELS {
                if let Some(verdict) = verdicts.next() {
                    entries.insert(entry_key(likelihood, impact), verdict.to_string());
                }
            }
        }
        MappingTable {
            likelihood_levels: OWASP_LEVELS.iter().map(|l| l.to_string()).collect(),
            impact_levels: OWASP_LEVELS.iter().map(|l| l.to_string()).collect(),
            entries,
        }
    }

    /// Verdict for a level pair, or the `"ERROR"` sentinel when unresolvable
    pub fn lookup(&self, likelihood_level: &str, impact_level: &str) -> String {
        if likelihood_level == ERROR_LEVEL || impact_level == ERROR_LEVEL {
            return ERROR_LEVEL.to_string();
        }
        self.entries
            .get(&entry_key(likelihood_level, impact_level))
            .cloned()
            .unwrap_or_else(|| ERROR_LEVEL.to_string())
    }

    pub fn likelihood_levels(&self) -> &[String] {
        &self.likelihood_levels
    }

    pub fn impact_levels(&self) -> &[String] {
        &self.impact_levels
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize back to the flat row-major list
    pub fn to_text(&self) -> String {
        let mut values = Vec::with_capacity(self.entries.len());
        for likelihood in &self.likelihood_levels {
            for impact in &self.impact_levels {
                values.push(self.lookup(likelihood, impact));
            }
        }
        values.join(",")
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        MappingTable::owasp_default()
    }
}

impl std::fmt::Display for MappingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
