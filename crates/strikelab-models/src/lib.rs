//! # StrikeLab Models
//!
//! Canonical data types shared by every StrikeLab crate.
//!
//! ## Description
//! Plain-data snapshots exchanged between the option-chain source, the
//! strategy builder, the metrics analyzer and the profit-matrix simulator.
//! Nothing in this crate performs pricing; it only fixes the shapes and the
//! sign/multiplier conventions that the analytics rely on.
//!
//! ## Layering
//! `models` → `options` → `runner`. Keeping these types here lets the
//! runner and external embedders exchange trades without depending on the
//! numerical code.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod quote;
pub mod trade;
pub mod matrix;
pub mod idea;

pub use quote::{expiry_instant, OptionQuote, OptionType};
pub use trade::{
    return_on_risk_credit, return_on_risk_debit, Action, Instrument, PortfolioGreeks, Sentiment, Trade, TradeDraft,
    TradeLeg, TradeMetrics,
};
pub use matrix::MatrixPoint;
pub use idea::{RiskProfile, TradeIdea};

/// Contract multiplier applied to every option leg (shares per contract).
pub const OPTION_MULTIPLIER: f64 = 100.0;
