//! Error taxonomy for parsing and configuration
//!
//! Parse and validation failures are typed errors. Classification that
//! cannot resolve is NOT an error: it travels in-band as the `"ERROR"`
//! sentinel (see [`crate::classify::ERROR_LEVEL`]).

use thiserror::Error;

/// Which score axis a range configuration belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Likelihood,
    Impact,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Likelihood => "likelihood",
            Axis::Impact => "impact",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while parsing or validating vectors, ranges and mappings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// Malformed text: wrong segment count, missing delimiter, bad number
    #[error("format error: {0}")]
    Format(String),

    /// Ranges parsed fine but do not cover 0-9 without a gap
    #[error("{axis} ranges must cover 0-9 continuously without gaps")]
    RangeCoverage { axis: Axis },

    /// Custom configuration requested with only some of its parameters
    #[error("missing required parameters: {}", missing.join(", "))]
    MissingParameter { missing: Vec<String> },
}

impl RiskError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        RiskError::Format(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;
