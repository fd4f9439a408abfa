//! # Option Quote Module
//!
//! Immutable option-chain rows as delivered by a market-data source.
//!
//! ## Description
//! An [`OptionQuote`] is one row of a chain snapshot: contract terms,
//! top-of-book prices and the vendor (or model) Greeks. The analytics read
//! quotes and never mutate them.

use chrono::{NaiveDate, NaiveTime, DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of the option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

impl OptionType {
    /// Payoff of one unit of the option if the underlying settles at `price`.
    pub fn intrinsic(&self, price: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (price - strike).max(0.0),
            OptionType::Put => (strike - price).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// One row of an option-chain snapshot.
///
/// # Fields
/// * `strike` - Exercise price, must be positive.
/// * `expiry` - Expiration calendar date.
/// * `option_type` - Call or Put.
/// * `bid` / `ask` / `last` - Per-share premiums.
/// * `implied_vol` - Annualized implied volatility (0.25 = 25%).
/// * `delta` / `gamma` / `theta` / `vega` - Per-share Greeks; theta is daily,
///   vega is per one volatility point.
/// * `underlying` - Underlying ticker symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: f64,
    pub expiry: NaiveDate,
    pub option_type: OptionType,
    #[serde(default)]
    pub bid: f64,
    #[serde(default)]
    pub ask: f64,
    #[serde(default)]
    pub last: f64,
    #[serde(default)]
    pub implied_vol: f64,
    #[serde(default)]
    pub delta: f64,
    #[serde(default)]
    pub gamma: f64,
    #[serde(default)]
    pub theta: f64,
    #[serde(default)]
    pub vega: f64,
    #[serde(default)]
    pub underlying: String,
}

impl OptionQuote {
    /// Bare quote with terms and prices only; Greeks are left at zero.
    pub fn new(
        underlying: impl Into<String>,
        option_type: OptionType,
        strike: f64,
        expiry: NaiveDate,
        bid: f64,
        ask: f64,
    ) -> Self {
        Self {
            strike,
            expiry,
            option_type,
            bid,
            ask,
            last: (bid + ask) / 2.0,
            implied_vol: 0.0,
            delta: 0.0,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            underlying: underlying.into(),
        }
    }

    /// Builder-style setter for the implied volatility.
    pub fn with_iv(mut self, implied_vol: f64) -> Self {
        self.implied_vol = implied_vol;
        self
    }

    pub fn is_call(&self) -> bool {
        self.option_type == OptionType::Call
    }

    /// The instant the contract stops trading: midnight UTC on the expiry date.
    pub fn expiry_instant(&self) -> DateTime<Utc> {
        expiry_instant(self.expiry)
    }

    /// Per-share payoff at expiry for an underlying settlement `price`.
    pub fn intrinsic(&self, price: f64) -> f64 {
        self.option_type.intrinsic(price, self.strike)
    }
}

/// Midnight UTC of a calendar date, the convention used for every expiry.
pub fn expiry_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_values() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_quote_deserializes_without_greeks() {
        let json = r#"{"strike":100.0,"expiry":"2026-11-20","option_type":"Put","bid":1.2,"ask":1.3}"#;
        let quote: OptionQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.option_type, OptionType::Put);
        assert_eq!(quote.delta, 0.0);
        assert!(quote.underlying.is_empty());
    }

    #[test]
    fn test_expiry_instant_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 20).unwrap();
        assert_eq!(expiry_instant(date).to_rfc3339(), "2026-11-20T00:00:00+00:00");
    }
}
