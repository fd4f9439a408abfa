//! # Trade Module
//!
//! Multi-leg trade definitions and their derived risk metrics.
//!
//! ## Description
//! A trade is an ordered list of legs plus a [`TradeMetrics`] block that is
//! always computed from those legs. Construction goes through
//! [`Trade::from_parts`], which takes a leg-only [`TradeDraft`] and a freshly
//! computed metrics value, so a trade never carries metrics for a different
//! leg set.
//!
//! ## Conventions
//! - `quantity` is a positive multiplier; direction lives in [`Action`].
//! - Option legs are scaled by [`crate::OPTION_MULTIPLIER`]; stock legs are
//!   raw share counts.
//! - `net_debit > 0` means money paid, `net_debit < 0` means credit received.
//!   Every P&L figure subtracts `net_debit` from gross value.

use crate::quote::OptionQuote;
use crate::OPTION_MULTIPLIER;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    /// +1 for purchases, -1 for sales.
    pub fn sign(&self) -> f64 {
        match self {
            Action::Buy => 1.0,
            Action::Sell => -1.0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "Buy"),
            Action::Sell => write!(f, "Sell"),
        }
    }
}

/// What a leg holds: shares of the underlying or an option contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instrument {
    /// Underlying shares bought or sold at `price`.
    Stock { price: f64 },
    /// A listed option row from the chain snapshot.
    Option(OptionQuote),
}

/// Individual component (leg) of a trade.
///
/// # Fields
/// * `action` - Buy or Sell.
/// * `quantity` - Contracts for option legs, shares for stock legs. Never zero.
/// * `instrument` - Stock or option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLeg {
    pub action: Action,
    pub quantity: u32,
    pub instrument: Instrument,
}

impl TradeLeg {
    pub fn option(action: Action, quantity: u32, quote: OptionQuote) -> Self {
        Self { action, quantity, instrument: Instrument::Option(quote) }
    }

    pub fn stock(action: Action, quantity: u32, price: f64) -> Self {
        Self { action, quantity, instrument: Instrument::Stock { price } }
    }

    pub fn is_stock(&self) -> bool {
        matches!(self.instrument, Instrument::Stock { .. })
    }

    /// The option row for option legs, `None` for stock legs.
    pub fn quote(&self) -> Option<&OptionQuote> {
        match &self.instrument {
            Instrument::Option(q) => Some(q),
            Instrument::Stock { .. } => None,
        }
    }

    /// Units the per-share price is multiplied by: `quantity × 100` for
    /// options, `quantity` for stock.
    pub fn units(&self) -> f64 {
        match self.instrument {
            Instrument::Stock { .. } => self.quantity as f64,
            Instrument::Option(_) => self.quantity as f64 * OPTION_MULTIPLIER,
        }
    }

    /// Per-share fill price: ask when buying, bid when selling, the stock
    /// price for stock legs regardless of side.
    pub fn entry_price(&self) -> f64 {
        match &self.instrument {
            Instrument::Stock { price } => *price,
            Instrument::Option(q) => match self.action {
                Action::Buy => q.ask,
                Action::Sell => q.bid,
            },
        }
    }

    /// Signed total-dollar entry cost (+ paid, - received).
    pub fn entry_cost(&self) -> f64 {
        self.action.sign() * self.entry_price() * self.units()
    }

    /// Expiration date for option legs.
    pub fn expiry(&self) -> Option<NaiveDate> {
        self.quote().map(|q| q.expiry)
    }
}

/// Directional bias of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// Maps loose user input onto the three canonical sentiments.
    ///
    /// `very_bullish`, `bullish` and `directional` map to Bullish;
    /// `very_bearish` and `bearish` to Bearish; `neutral` to Neutral.
    /// Matching ignores case and treats `-`/space like `_`.
    /// Anything else returns `None` (no filter).
    pub fn normalize(input: &str) -> Option<Self> {
        let key = input.trim().to_ascii_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        match key.as_str() {
            "very_bullish" | "bullish" | "directional" => Some(Sentiment::Bullish),
            "very_bearish" | "bearish" => Some(Sentiment::Bearish),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Bullish => write!(f, "Bullish"),
            Sentiment::Bearish => write!(f, "Bearish"),
            Sentiment::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Position-weighted Greeks of a whole trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
}

impl PortfolioGreeks {
    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
        }
    }
}

/// Derived risk figures of a trade, all in total-dollar terms.
///
/// # Fields
/// * `net_debit` - Entry cost; positive for debit, negative for credit.
/// * `max_profit` - Highest expiry P&L found by the price scan.
/// * `max_risk` - Worst expiry loss as a positive number, floored at 0.
/// * `break_evens` - Expiry prices where P&L crosses zero, rounded to cents.
/// * `greeks` - Portfolio Greeks.
/// * `profit_unbounded` - P&L is still rising at the top of the scan range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub net_debit: f64,
    pub max_profit: f64,
    pub max_risk: f64,
    pub break_evens: Vec<f64>,
    pub greeks: PortfolioGreeks,
    #[serde(default)]
    pub profit_unbounded: bool,
}

impl TradeMetrics {
    /// Credit received, 0 for debit trades.
    pub fn net_credit(&self) -> f64 {
        (-self.net_debit).max(0.0)
    }

    pub fn is_credit(&self) -> bool {
        self.net_debit < 0.0
    }

    /// Return on risk in percent: [`return_on_risk_credit`] for credit
    /// trades, [`return_on_risk_debit`] otherwise.
    pub fn return_on_risk(&self) -> f64 {
        if self.is_credit() {
            return_on_risk_credit(self.net_credit(), self.max_risk)
        } else {
            return_on_risk_debit(self.max_profit, self.net_debit)
        }
    }
}

/// Return on a debit trade, in percent: max profit / net debit × 100.
/// Zero when the debit is not positive.
pub fn return_on_risk_debit(max_profit: f64, net_debit: f64) -> f64 {
    if net_debit <= 0.0 {
        return 0.0;
    }
    max_profit / net_debit * 100.0
}

/// Return on a credit trade, in percent: net credit / max risk × 100.
/// Zero when the risk is not positive.
pub fn return_on_risk_credit(net_credit: f64, max_risk: f64) -> f64 {
    if max_risk <= 0.0 {
        return 0.0;
    }
    net_credit / max_risk * 100.0
}

/// Leg-only description of a trade, before metrics are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sentiment: Sentiment,
    pub legs: Vec<TradeLeg>,
}

impl TradeDraft {
    pub fn new(name: impl Into<String>, sentiment: Sentiment, legs: Vec<TradeLeg>) -> Self {
        Self { name: name.into(), description: String::new(), sentiment, legs }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A fully evaluated multi-leg trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub name: String,
    pub description: String,
    pub sentiment: Sentiment,
    legs: Vec<TradeLeg>,
    #[serde(flatten)]
    metrics: TradeMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_label: Option<String>,
}

impl Trade {
    /// Joins a draft with the metrics computed from exactly its legs.
    pub fn from_parts(draft: TradeDraft, metrics: TradeMetrics) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            sentiment: draft.sentiment,
            legs: draft.legs,
            metrics,
            expiration_date: None,
            expiry_label: None,
        }
    }

    pub fn legs(&self) -> &[TradeLeg] {
        &self.legs
    }

    pub fn metrics(&self) -> &TradeMetrics {
        &self.metrics
    }

    pub fn net_debit(&self) -> f64 {
        self.metrics.net_debit
    }

    /// Copies the leg-only part back out, e.g. to edit legs and re-evaluate.
    pub fn to_draft(&self) -> TradeDraft {
        TradeDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            sentiment: self.sentiment,
            legs: self.legs.clone(),
        }
    }

    /// Latest expiration across option legs.
    pub fn latest_expiry(&self) -> Option<NaiveDate> {
        self.legs.iter().filter_map(TradeLeg::expiry).max()
    }
}
