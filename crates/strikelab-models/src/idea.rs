//! Risk-profile trade ideas produced by the strategist.

use crate::trade::Trade;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Appetite bucket an idea is pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    /// Income-focused diagonal ("The Landlord").
    Low,
    /// Aggressive diagonal ("The Strategist").
    Medium,
    /// Single long call chasing a price target ("The Moonshot").
    Degen,
}

impl RiskProfile {
    pub fn label(&self) -> &'static str {
        match self {
            RiskProfile::Low => "Low (The Landlord)",
            RiskProfile::Medium => "Medium (The Strategist)",
            RiskProfile::Degen => "Degen (The Moonshot)",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A trade pitched at a risk profile, with a free-text ROI expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIdea {
    pub risk_profile: RiskProfile,
    pub description: String,
    pub trade: Trade,
    pub roi: String,
}
