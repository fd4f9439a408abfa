//! # Option Chain Module
//!
//! Chain snapshots and the strike-selection primitives used by strategy recipes.
//!
//! ## Description
//! An [`OptionChain`] is a read-only snapshot of quotes for one underlying,
//! kept sorted by strike (stable, so equal strikes keep their input order).
//! It may span several expirations; [`OptionChain::nearest_to_expiry`]
//! narrows it to the single expiration closest to a target date.
//!
//! ## Selection primitives
//! - [`OptionChain::nearest_strike`] - strike closest to a target
//! - [`OptionChain::nth_otm`] / [`OptionChain::nth_itm`] - Nth strike beyond a price
//! - [`OptionChain::closest_delta`] - quote whose delta is nearest a target

use crate::greeks::OptionGreeks;
use crate::pricing::PricingConfig;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strikelab_models::{OptionQuote, OptionType};
use tracing::{debug, warn};

/// Serialized form of a chain as delivered by a market-data source.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainSnapshot {
    pub underlying: String,
    pub spot_price: f64,
    pub quotes: Vec<OptionQuote>,
}

impl From<ChainSnapshot> for OptionChain {
    fn from(s: ChainSnapshot) -> Self {
        OptionChain::new(s.underlying, s.spot_price, s.quotes)
    }
}

/// Strike-sorted quotes for one underlying at a reference spot price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChainSnapshot")]
pub struct OptionChain {
    pub underlying: String,
    /// Current price of the underlying.
    pub spot_price: f64,
    quotes: Vec<OptionQuote>,
}

impl OptionChain {
    /// Builds a chain, dropping rows with a non-positive or non-finite strike.
    pub fn new(underlying: impl Into<String>, spot_price: f64, quotes: Vec<OptionQuote>) -> Self {
        let underlying = underlying.into();
        let before = quotes.len();
        let mut quotes: Vec<OptionQuote> = quotes
            .into_iter()
            .filter(|q| q.strike.is_finite() && q.strike > 0.0)
            .collect();
        if quotes.len() < before {
            warn!("Dropped {} {} quotes with invalid strikes", before - quotes.len(), underlying);
        }
        quotes.sort_by(|a, b| a.strike.total_cmp(&b.strike));

        Self { underlying, spot_price, quotes }
    }

    pub fn quotes(&self) -> &[OptionQuote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Distinct expirations in ascending order.
    pub fn expiries(&self) -> Vec<NaiveDate> {
        let mut expiries: Vec<NaiveDate> = self.quotes.iter().map(|q| q.expiry).collect();
        expiries.sort();
        expiries.dedup();
        expiries
    }

    /// Expiration closest to `target`; the earlier date wins a tie.
    pub fn closest_expiry(&self, target: NaiveDate) -> Option<NaiveDate> {
        self.expiries()
            .into_iter()
            .min_by_key(|expiry| (*expiry - target).num_days().abs())
    }

    /// Like [`OptionChain::closest_expiry`], restricted to expirations on or
    /// after `today`.
    pub fn closest_live_expiry(&self, target: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
        self.expiries()
            .into_iter()
            .filter(|expiry| *expiry >= today)
            .min_by_key(|expiry| (*expiry - target).num_days().abs())
    }

    /// Sub-chain holding only quotes that expire on `expiry`.
    pub fn for_expiry(&self, expiry: NaiveDate) -> OptionChain {
        OptionChain {
            underlying: self.underlying.clone(),
            spot_price: self.spot_price,
            quotes: self.quotes.iter().filter(|q| q.expiry == expiry).cloned().collect(),
        }
    }

    /// Sub-chain for the expiration closest to `target` (empty if the chain is).
    pub fn nearest_to_expiry(&self, target: NaiveDate) -> OptionChain {
        match self.closest_expiry(target) {
            Some(expiry) => {
                debug!(%target, %expiry, "Matched target date to expiry");
                self.for_expiry(expiry)
            }
            None => self.for_expiry(target),
        }
    }

    /// Quote of `option_type` whose strike is closest to `target`.
    /// Exact distance ties go to the lower strike.
    pub fn nearest_strike(&self, target: f64, option_type: OptionType) -> Option<&OptionQuote> {
        self.anchor_index(target, option_type).map(|i| &self.quotes[i])
    }

    /// Quote of `option_type` at exactly `strike`.
    pub fn at_strike(&self, strike: f64, option_type: OptionType) -> Option<&OptionQuote> {
        self.quotes
            .iter()
            .find(|q| q.option_type == option_type && q.strike == strike)
    }

    /// Nth out-of-the-money strike (1-based) relative to `price`:
    /// calls strictly above it, puts strictly below.
    pub fn nth_otm(&self, price: f64, option_type: OptionType, n: usize) -> Option<&OptionQuote> {
        match option_type {
            OptionType::Call => self.nth_beyond(price, option_type, n, true),
            OptionType::Put => self.nth_beyond(price, option_type, n, false),
        }
    }

    /// Nth in-the-money strike (1-based) relative to `price`:
    /// calls strictly below it, puts strictly above.
    pub fn nth_itm(&self, price: f64, option_type: OptionType, n: usize) -> Option<&OptionQuote> {
        match option_type {
            OptionType::Call => self.nth_beyond(price, option_type, n, false),
            OptionType::Put => self.nth_beyond(price, option_type, n, true),
        }
    }

    /// Quote of `option_type` whose delta is nearest `target_delta`.
    pub fn closest_delta(&self, option_type: OptionType, target_delta: f64) -> Option<&OptionQuote> {
        let mut best: Option<&OptionQuote> = None;
        let mut min_diff = f64::MAX;
        for quote in self.quotes.iter().filter(|q| q.option_type == option_type) {
            let diff = (quote.delta - target_delta).abs();
            if diff < min_diff {
                min_diff = diff;
                best = Some(quote);
            }
        }
        best
    }

    /// Copy of the chain with every quote's Greeks recomputed from the model.
    ///
    /// # Description
    /// Each quote is revalued at the chain's spot with its own implied
    /// volatility (0.5 when the quote carries none) and the time to expiry
    /// floored at `config.time_floor_years`. Greeks are rounded to 3 decimals.
    pub fn with_model_greeks(&self, as_of: DateTime<Utc>, config: &PricingConfig) -> OptionChain {
        const FALLBACK_IV: f64 = 0.5;

        let quotes = self
            .quotes
            .iter()
            .map(|q| {
                let time = config.time_to_expiry(as_of, q.expiry);
                let iv = if q.implied_vol > 0.0 { q.implied_vol } else { FALLBACK_IV };
                let greeks = OptionGreeks::compute(
                    q.option_type, self.spot_price, q.strike, time, config.risk_free_rate, iv,
                ).rounded(3);
                OptionQuote {
                    implied_vol: iv,
                    delta: greeks.delta,
                    gamma: greeks.gamma,
                    theta: greeks.theta,
                    vega: greeks.vega,
                    ..q.clone()
                }
            })
            .collect();

        OptionChain {
            underlying: self.underlying.clone(),
            spot_price: self.spot_price,
            quotes,
        }
    }

    /// Index of the `option_type` quote closest to `target`, first on ties.
    fn anchor_index(&self, target: f64, option_type: OptionType) -> Option<usize> {
        let mut anchor = None;
        let mut min_diff = f64::MAX;
        for (i, quote) in self.quotes.iter().enumerate() {
            if quote.option_type != option_type {
                continue;
            }
            let diff = (quote.strike - target).abs();
            if diff < min_diff {
                min_diff = diff;
                anchor = Some(i);
            }
        }
        anchor
    }

    /// Walks outward from the at-the-money anchor counting strikes strictly
    /// above (`upward`) or strictly below `spot` and returns the Nth.
    fn nth_beyond(&self, spot: f64, option_type: OptionType, n: usize, upward: bool) -> Option<&OptionQuote> {
        if n == 0 {
            return None;
        }
        let anchor = self.anchor_index(spot, option_type)?;

        if upward {
            self.quotes[anchor..]
                .iter()
                .filter(|q| q.option_type == option_type && q.strike > spot)
                .nth(n - 1)
        } else {
            self.quotes[..=anchor]
                .iter()
                .rev()
                .filter(|q| q.option_type == option_type && q.strike < spot)
                .nth(n - 1)
        }
    }
}
