//! riskcalc core library - OWASP Risk Rating scoring and shareable configurations

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Every calculation is a pure function of a vector and a configuration
// - No global mutable state; built-in configurations are constants
// - No randomness, clocks, threads, or async
// - Malformed input is a typed error, unresolvable classification is the "ERROR" sentinel
// - Identical input yields identical output

pub mod classify;
pub mod config;
pub mod error;
pub mod factor;
pub mod mapping;
pub mod query;
pub mod range;
pub mod report;
pub mod resolver;
pub mod score;
pub mod store;
pub mod vector;

pub use classify::{classify, ERROR_LEVEL};
pub use config::ResolvedConfig;
pub use error::{Axis, Result, RiskError};
pub use factor::Factor;
pub use mapping::MappingTable;
pub use query::{resolve_with_fallback, share_url, QueryParams};
pub use range::{validate_continuous, NamedConfiguration, RangeConfig, DEFAULT_CONFIGURATION};
pub use report::{render_json, render_text, AssessmentReport};
pub use resolver::{resolve, ClassificationResult, CustomConfiguration, RiskResolver, Selection};
pub use score::{impact_score, likelihood_score};
pub use store::{FileStore, MappingStore, MemoryStore};
pub use vector::Vector;

/// Parse vector text and resolve it against a built-in configuration
///
/// Unknown configuration names resolve as the default configuration.
pub fn assess(vector_text: &str, configuration: &str) -> Result<ClassificationResult> {
    let vector = Vector::parse(vector_text)?;
    Ok(resolve(&vector, &Selection::named(configuration)))
}
