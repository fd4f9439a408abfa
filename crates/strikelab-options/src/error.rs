//! Error types for the options engine.

use chrono::NaiveDate;

/// Failures surfaced by the options engine.
///
/// # Variants
/// * `InvalidInput` - A pricing input violated its domain (e.g. T ≤ 0, σ ≤ 0).
/// * `EmptyChain` - No quotes left after expiry filtering.
/// * `InvalidLeg` - A leg breaks the trade invariants.
/// * `InfeasibleStrategy` - A recipe found no suitable strikes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid pricing input: {param} = {value}")]
    InvalidInput { param: &'static str, value: f64 },
    #[error("option chain for {underlying} is empty (target expiry {target:?})")]
    EmptyChain { underlying: String, target: Option<NaiveDate> },
    #[error("invalid trade leg: {0}")]
    InvalidLeg(String),
    #[error("strategy {0} cannot be built from this chain")]
    InfeasibleStrategy(String),
}

pub type Result<T> = std::result::Result<T, OptionsError>;
