//! Likelihood and impact scores
//!
//! Global invariants enforced:
//! - Deterministic, total functions over a vector
//! - Likelihood divides by the fixed factor count, never by "present" values

use crate::factor::Factor;
use crate::vector::Vector;

/// Mean of the eight likelihood factors
pub fn likelihood_score(vector: &Vector) -> f64 {
    let total: f64 = Factor::LIKELIHOOD.iter().map(|f| vector.get(*f)).sum();
    total / Factor::LIKELIHOOD.len() as f64
}

/// Maximum of the eight impact factors
pub fn impact_score(vector: &Vector) -> f64 {
    Factor::IMPACT
        .iter()
        .map(|f| vector.get(*f))
        .fold(0.0, f64::max)
}

/// Both scores as `(likelihood, impact)`
pub fn compute_scores(vector: &Vector) -> (f64, f64) {
    (likelihood_score(vector), impact_score(vector))
}
