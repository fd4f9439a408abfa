//! # StrikeLab Options Engine
//!
//! Pricing, strategy construction and profit simulation for listed options.
//!
//! ## Description
//! The analytical core of StrikeLab. Every entry point is a synchronous,
//! side-effect-free function over immutable inputs, so callers may fan
//! requests out across threads without coordination.
//!
//! ### Core Subsystems
//! - **Pricing & Greeks**: Black-Scholes-Merton valuation, Greeks, a
//!   Newton-Raphson implied-volatility solver, probability of profit and
//!   return-on-risk helpers.
//! - **Chains**: single- and multi-expiry chain snapshots with the strike
//!   selection primitives (nearest strike, Nth OTM/ITM, nearest delta).
//! - **Strategy Builder**: a fixed catalogue of named multi-leg recipes.
//! - **Metrics Analyzer**: net debit, portfolio Greeks, max profit/risk and
//!   break-evens by expiry payoff scanning.
//! - **Profit Matrix**: time × price P&L grid with z-scores.
//! - **Strategist**: risk-profile trade ideas across expiries.
//!
//! ## References
//! - Black, F., & Scholes, M. (1973). The Pricing of Options and Corporate Liabilities.
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod error;
pub mod pricing;
pub mod greeks;
pub mod chain;
pub mod synthetic;
pub mod analysis;
pub mod strategy;
pub mod matrix;
pub mod strategist;

pub use error::{OptionsError, Result};
pub use pricing::{black_scholes, implied_volatility, probability_of_profit, IvSolution, OptionValuation, PricingConfig};
pub use greeks::OptionGreeks;
pub use chain::OptionChain;
pub use analysis::{compute_metrics, evaluate, pnl_at_expiry, ScanConfig};
pub use strategy::{generate_strategies, StrategyKind, StrategyRequest};
pub use matrix::{calculate_profit_matrix, MatrixConfig};
pub use strategist::find_trade_ideas;

pub use strikelab_models as models;
