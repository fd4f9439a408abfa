//! # Option Greeks Module
//!
//! Per-contract sensitivities and their position-weighted aggregation.
//!
//! ## Description
//! [`OptionGreeks`] holds the per-share Greeks of one contract, computed
//! from the pricing model or read from a chain quote. [`leg_greeks`] scales
//! them into the signed, multiplier-weighted contribution a leg makes to a
//! trade's portfolio Greeks.
//!
//! ## Greeks Computed
//! | Greek | Symbol | Measures sensitivity to | Units |
//! |-------|--------|------------------------|-------|
//! | Delta | Δ | Underlying price | per $1 |
//! | Gamma | Γ | Delta (second-order) | per $1 |
//! | Theta | Θ | Time decay | per calendar day |
//! | Vega  | ν | Volatility | per vol point |
//!
//! ## References
//! - Hull, J. C. (2018). Options, Futures, and Other Derivatives, 10th ed.

use crate::pricing::black_scholes;
use serde::{Deserialize, Serialize};
use strikelab_models::{Instrument, OptionQuote, OptionType, PortfolioGreeks, TradeLeg};

/// Per-share Greeks of a single option contract.
///
/// # Examples
/// ```
/// use strikelab_options::greeks::OptionGreeks;
/// use strikelab_options::models::OptionType;
///
/// let call = OptionGreeks::compute(OptionType::Call, 100.0, 100.0, 30.0 / 365.0, 0.05, 0.25);
/// let put = OptionGreeks::compute(OptionType::Put, 100.0, 100.0, 30.0 / 365.0, 0.05, 0.25);
/// let straddle = call.add(&put);
/// assert!(straddle.delta.abs() < 0.1); // Near delta-neutral
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
}

impl OptionGreeks {
    /// Model Greeks for a contract.
    ///
    /// # Description
    /// Uses Black-Scholes when the inputs are in domain. At or past expiry
    /// (or with no volatility) the contract behaves like its payoff: delta
    /// is 0 or ±1 and every other Greek is zero.
    pub fn compute(option_type: OptionType, spot: f64, strike: f64, time: f64, rate: f64, volatility: f64) -> Self {
        match black_scholes(option_type, spot, strike, time, rate, volatility) {
            Ok(v) => Self { delta: v.delta, gamma: v.gamma, theta: v.theta, vega: v.vega },
            Err(_) => Self::at_expiry(option_type, spot, strike),
        }
    }

    /// Greeks of the expiry payoff.
    fn at_expiry(option_type: OptionType, spot: f64, strike: f64) -> Self {
        let delta = match option_type {
            OptionType::Call if spot > strike => 1.0,
            OptionType::Put if spot < strike => -1.0,
            _ => 0.0,
        };
        Self { delta, ..Self::default() }
    }

    /// Greeks as quoted on a chain row.
    pub fn from_quote(quote: &OptionQuote) -> Self {
        Self {
            delta: quote.delta,
            gamma: quote.gamma,
            theta: quote.theta,
            vega: quote.vega,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
        }
    }

    /// Multiplies all Greeks by a signed position size.
    pub fn scale(&self, quantity: f64) -> Self {
        Self {
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            theta: self.theta * quantity,
            vega: self.vega * quantity,
        }
    }

    /// Rounds every Greek to `decimals` places.
    pub fn rounded(&self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        let round = |x: f64| (x * factor).round() / factor;
        Self {
            delta: round(self.delta),
            gamma: round(self.gamma),
            theta: round(self.theta),
            vega: round(self.vega),
        }
    }
}

impl From<OptionGreeks> for PortfolioGreeks {
    fn from(g: OptionGreeks) -> Self {
        PortfolioGreeks { delta: g.delta, gamma: g.gamma, theta: g.theta, vega: g.vega }
    }
}

/// Signed contribution of one leg to the portfolio Greeks.
///
/// Stock legs add ±quantity to delta only. Option legs add the quoted
/// Greeks times ±quantity × 100.
pub fn leg_greeks(leg: &TradeLeg) -> PortfolioGreeks {
    let sign = leg.action.sign();
    match &leg.instrument {
        Instrument::Stock { .. } => PortfolioGreeks {
            delta: sign * leg.quantity as f64,
            ..PortfolioGreeks::default()
        },
        Instrument::Option(quote) => OptionGreeks::from_quote(quote).scale(sign * leg.units()).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use strikelab_models::Action;

    #[test]
    fn test_atm_straddle_delta() {
        // ATM straddle should have near-zero delta
        let time = 7.0 / 365.0;
        let call_greeks = OptionGreeks::compute(OptionType::Call, 250.0, 250.0, time, 0.05, 0.15);
        let put_greeks = OptionGreeks::compute(OptionType::Put, 250.0, 250.0, time, 0.05, 0.15);
        let straddle = call_greeks.add(&put_greeks);

        assert!(straddle.delta.abs() < 0.1, "ATM straddle delta should be near zero: {}", straddle.delta);
        assert!(straddle.gamma > 0.0, "Straddle should have positive gamma");
        assert!(straddle.vega > 0.0, "Straddle should have positive vega");
    }

    #[test]
    fn test_expired_contract_greeks() {
        let itm_put = OptionGreeks::compute(OptionType::Put, 90.0, 100.0, 0.0, 0.05, 0.2);
        assert_eq!(itm_put, OptionGreeks { delta: -1.0, ..Default::default() });
        let otm_call = OptionGreeks::compute(OptionType::Call, 90.0, 100.0, -0.1, 0.05, 0.2);
        assert_eq!(otm_call, OptionGreeks::default());
    }

    #[test]
    fn test_leg_greeks_signs_and_multiplier() {
        let expiry = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
        let mut quote = OptionQuote::new("XYZ", OptionType::Call, 100.0, expiry, 2.0, 2.1);
        quote.delta = 0.5;
        quote.gamma = 0.04;
        quote.theta = -0.05;
        quote.vega = 0.12;

        let short = leg_greeks(&TradeLeg::option(Action::Sell, 2, quote));
        assert!((short.delta + 100.0).abs() < 1e-9);
        assert!((short.gamma + 8.0).abs() < 1e-9);
        assert!((short.theta - 10.0).abs() < 1e-9);
        assert!((short.vega + 24.0).abs() < 1e-9);

        let stock = leg_greeks(&TradeLeg::stock(Action::Buy, 100, 99.0));
        assert_eq!(stock, PortfolioGreeks { delta: 100.0, ..Default::default() });
    }
}
