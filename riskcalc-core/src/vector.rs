//! Factor vector and its text codec
//!
//! Wire form: `(SL:1/M:4/O:0/.../PV:3)`. Parentheses are optional on input;
//! keys are matched case-insensitively. Exactly 16 segments are required,
//! unknown keys are dropped with a warning and absent keys stay 0.

use crate::error::{Result, RiskError};
use crate::factor::Factor;

/// Lowest value a factor may take
pub const SCALE_MIN: f64 = 0.0;
/// Highest value a factor may take
pub const SCALE_MAX: f64 = 9.0;

/// Number of `KEY:value` segments in vector text
const SEGMENT_COUNT: usize = 16;

/// Values for all sixteen factors, indexed by [`Factor::index`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    values: [f64; 16],
}

impl Default for Vector {
    fn default() -> Self {
        Vector::zero()
    }
}

impl Vector {
    /// Vector with every factor at 0
    pub fn zero() -> Self {
        Vector { values: [0.0; 16] }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        self.values[factor.index()]
    }

    /// Set a factor value. Bounds are not checked here; see [`Vector::validate`].
    pub fn set(&mut self, factor: Factor, value: f64) -> &mut Self {
        self.values[factor.index()] = value;
        self
    }

    /// Builder-style variant of [`Vector::set`]
    pub fn with(mut self, factor: Factor, value: f64) -> Self {
        self.set(factor, value);
        self
    }

    /// Iterate `(factor, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    /// Check every value is finite and within [0, 9]
    pub fn validate(&self) -> Result<()> {
        for (factor, value) in self.iter() {
            check_value(factor.key(), value)?;
        }
        Ok(())
    }

    /// Parse vector text, with or without surrounding parentheses
    pub fn parse(text: &str) -> Result<Vector> {
        let trimmed = text.trim();
        let inner = trimmed.strip_prefix('(').unwrap_or(trimmed);
        let inner = inner.strip_suffix(')').unwrap_or(inner);

        let segments: Vec<&str> = inner.split('/').collect();
        if segments.len() != SEGMENT_COUNT {
            return Err(RiskError::format(format!(
                "vector must have {} segments, found {}",
                SEGMENT_COUNT,
                segments.len()
            )));
        }

        let mut vector = Vector::zero();
        for segment in segments {
            let (key, raw) = segment.split_once(':').ok_or_else(|| {
                RiskError::format(format!("vector segment '{}' is missing ':'", segment))
            })?;
            let Some(factor) = Factor::from_key(key) else {
                tracing::warn!(key = key.trim(), "ignoring unknown vector key");
                continue;
            };
            let value = parse_number(raw)
                .ok_or_else(|| RiskError::format(format!("invalid value for {}: '{}'", key, raw)))?;
            check_value(key, value)?;
            vector.set(factor, value);
        }

        Ok(vector)
    }

    /// Display form: `(SL:1/M:1/.../PV:0)`
    pub fn to_wrapped_string(&self) -> String {
        format!("({})", self.to_bare_string())
    }

    /// Query-string form: `SL:1/M:1/.../PV:0`
    pub fn to_bare_string(&self) -> String {
        self.iter()
            .map(|(factor, value)| format!("{}:{}", factor.key().to_uppercase(), value))
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl std::str::FromStr for Vector {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        Vector::parse(s)
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wrapped_string())
    }
}

/// Parse a finite number, rejecting `inf`/`NaN` spellings
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn check_value(key: &str, value: f64) -> Result<()> {
    if !(SCALE_MIN..=SCALE_MAX).contains(&value) {
        return Err(RiskError::format(format!(
            "value for {} must be between 0 and 9 (got {})",
            key.trim(),
            value
        )));
    }
    Ok(())
}
