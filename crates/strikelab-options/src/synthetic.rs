//! # Synthetic Chain Generator
//!
//! Deterministic mock option chains for offline runs and tests.
//!
//! ## Description
//! Generates a multi-expiry chain around a spot price: strikes every
//! `strike_step` from `round(0.8·S / step)·step` up to `1.2·S`, a per-strike
//! implied volatility drawn uniformly from `[iv_min, iv_max)`, a Black-Scholes
//! fair value and a symmetric bid/ask spread around it. Calls and puts at a
//! strike share the same volatility draw. The RNG is a seeded PCG stream, so
//! the same seed always yields the same chain.

use crate::chain::OptionChain;
use crate::error::{OptionsError, Result};
use crate::greeks::OptionGreeks;
use crate::pricing::{black_scholes, PricingConfig};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use strikelab_models::{OptionQuote, OptionType};
use tracing::info;

/// Shape of a generated chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Calendar days from the as-of date to each generated expiry.
    pub expiry_days: Vec<i64>,
    pub seed: u64,
    pub strike_step: f64,
    /// Strikes span `[1 - band, 1 + band] × spot`.
    pub strike_band: f64,
    pub iv_min: f64,
    pub iv_max: f64,
    /// Full bid/ask spread as a fraction of fair value.
    pub spread: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            expiry_days: vec![7, 14, 30, 60, 90, 180, 365],
            seed: 42,
            strike_step: 5.0,
            strike_band: 0.20,
            iv_min: 0.20,
            iv_max: 0.40,
            spread: 0.02,
        }
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// Builds a synthetic chain for `underlying` at `spot`.
///
/// # Returns
/// The chain, or [`OptionsError::InvalidInput`] if `spot`, the strike step
/// or the volatility range is unusable.
pub fn synthetic_chain(
    underlying: &str,
    spot: f64,
    as_of: DateTime<Utc>,
    config: &SyntheticConfig,
    pricing: &PricingConfig,
) -> Result<OptionChain> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(OptionsError::InvalidInput { param: "spot", value: spot });
    }
    if !(config.strike_step > 0.0) {
        return Err(OptionsError::InvalidInput { param: "strike_step", value: config.strike_step });
    }
    if !(config.iv_min > 0.0 && config.iv_max >= config.iv_min) {
        return Err(OptionsError::InvalidInput { param: "iv_min", value: config.iv_min });
    }

    let mut rng = Pcg64::seed_from_u64(config.seed);
    let start = ((spot * (1.0 - config.strike_band)) / config.strike_step).round() * config.strike_step;
    let end = spot * (1.0 + config.strike_band);
    let today = as_of.date_naive();
    let mut quotes = Vec::new();

    for &days in &config.expiry_days {
        let expiry = today + Duration::days(days);
        let time = pricing.time_to_expiry(as_of, expiry);

        let mut strike = start.max(config.strike_step);
        while strike <= end {
            let iv = if config.iv_max > config.iv_min {
                rng.gen_range(config.iv_min..config.iv_max)
            } else {
                config.iv_min
            };

            for option_type in [OptionType::Call, OptionType::Put] {
                let value = black_scholes(option_type, spot, strike, time, pricing.risk_free_rate, iv)?;
                let half_spread = value.price * config.spread / 2.0;
                let bid = (value.price - half_spread).max(0.0);
                let ask = value.price + half_spread;
                let greeks = OptionGreeks {
                    delta: value.delta,
                    gamma: value.gamma,
                    theta: value.theta,
                    vega: value.vega,
                }
                .rounded(3);

                quotes.push(OptionQuote {
                    strike,
                    expiry,
                    option_type,
                    bid: round_to(bid, 2),
                    ask: round_to(ask, 2),
                    last: round_to(value.price, 2),
                    implied_vol: iv,
                    delta: greeks.delta,
                    gamma: greeks.gamma,
                    theta: greeks.theta,
                    vega: greeks.vega,
                    underlying: underlying.to_string(),
                });
            }
            strike += config.strike_step;
        }
    }

    info!("Generated synthetic {} chain: {} quotes over {} expiries", underlying, quotes.len(), config.expiry_days.len());
    Ok(OptionChain::new(underlying, spot, quotes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_strike_grid_and_expiries() {
        let config = SyntheticConfig { expiry_days: vec![30], ..Default::default() };
        let chain = synthetic_chain("XYZ", 100.0, as_of(), &config, &PricingConfig::default()).unwrap();

        // 80, 85, ..., 120 for both calls and puts
        assert_eq!(chain.len(), 18);
        assert_eq!(chain.quotes().first().unwrap().strike, 80.0);
        assert_eq!(chain.quotes().last().unwrap().strike, 120.0);
        assert_eq!(chain.expiries().len(), 1);
    }

    #[test]
    fn test_same_seed_same_chain() {
        let config = SyntheticConfig::default();
        let a = synthetic_chain("XYZ", 250.0, as_of(), &config, &PricingConfig::default()).unwrap();
        let b = synthetic_chain("XYZ", 250.0, as_of(), &config, &PricingConfig::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.expiries().len(), 7);
    }

    #[test]
    fn test_quotes_are_sane() {
        let chain = synthetic_chain("XYZ", 100.0, as_of(), &SyntheticConfig::default(), &PricingConfig::default()).unwrap();
        for q in chain.quotes() {
            assert!(q.bid >= 0.0 && q.ask >= q.bid, "Crossed market at {}", q.strike);
            assert!(q.implied_vol >= 0.20 && q.implied_vol < 0.40);
            match q.option_type {
                OptionType::Call => assert!(q.delta >= 0.0 && q.delta <= 1.0),
                OptionType::Put => assert!(q.delta >= -1.0 && q.delta <= 0.0),
            }
        }
    }

    #[test]
    fn test_rejects_bad_spot() {
        let result = synthetic_chain("XYZ", 0.0, as_of(), &SyntheticConfig::default(), &PricingConfig::default());
        assert!(matches!(result, Err(OptionsError::InvalidInput { param: "spot", .. })));
    }
}
