//! # Trade Metrics Analyzer
//!
//! Net debit, portfolio Greeks, max profit/risk and break-evens of a leg set.
//!
//! ## Description
//! Metrics are a pure function of the legs: [`compute_metrics`] returns a
//! fresh [`TradeMetrics`] and [`evaluate`] joins it with the draft into a
//! [`Trade`]. Extremes and break-evens come from scanning the expiry payoff
//! over `[0, upper_multiple × current_price]` in `steps` equal increments and
//! linearly interpolating each sign change. Expiry payoffs are
//! piecewise-linear, so the interpolation is exact between kinks.
//!
//! ## Units
//! Everything is total dollars: option premiums and payoffs are multiplied by
//! `quantity × 100`, stock legs by share count only. P&L always starts from
//! `-net_debit`.

use crate::error::{OptionsError, Result};
use crate::greeks::leg_greeks;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strikelab_models::{Instrument, PortfolioGreeks, Trade, TradeDraft, TradeLeg, TradeMetrics};

/// Resolution of the expiry payoff scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of equal increments; the scan evaluates `steps + 1` prices.
    pub steps: usize,
    /// Upper end of the scan as a multiple of the current price.
    pub upper_multiple: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { steps: 1000, upper_multiple: 3.0 }
    }
}

/// Checks a leg against the trade invariants as of `as_of`.
///
/// Quantity must be positive; option legs need a positive strike and an
/// expiry not before `as_of`; stock legs need a positive price.
pub fn validate_leg(leg: &TradeLeg, as_of: NaiveDate) -> Result<()> {
    if leg.quantity == 0 {
        return Err(OptionsError::InvalidLeg("quantity must be positive".to_string()));
    }
    match &leg.instrument {
        Instrument::Stock { price } => {
            if !(price.is_finite() && *price > 0.0) {
                return Err(OptionsError::InvalidLeg(format!("stock price {} must be positive", price)));
            }
        }
        Instrument::Option(q) => {
            if !(q.strike.is_finite() && q.strike > 0.0) {
                return Err(OptionsError::InvalidLeg(format!("strike {} must be positive", q.strike)));
            }
            if q.expiry < as_of {
                return Err(OptionsError::InvalidLeg(format!(
                    "{} {:.2} expired on {} (as of {})", q.option_type, q.strike, q.expiry, as_of
                )));
            }
        }
    }
    Ok(())
}

/// Signed total entry cost of the legs (+ paid, - received).
pub fn net_debit(legs: &[TradeLeg]) -> f64 {
    legs.iter().map(TradeLeg::entry_cost).sum()
}

/// Sum of every leg's signed, multiplier-weighted Greeks.
pub fn portfolio_greeks(legs: &[TradeLeg]) -> PortfolioGreeks {
    legs.iter()
        .fold(PortfolioGreeks::default(), |acc, leg| acc.add(&leg_greeks(leg)))
}

/// Unsigned total-dollar value of one leg if the underlying settles at `price`.
fn leg_value_at_expiry(leg: &TradeLeg, price: f64) -> f64 {
    match &leg.instrument {
        Instrument::Stock { .. } => price * leg.units(),
        Instrument::Option(q) => q.intrinsic(price) * leg.units(),
    }
}

/// Total P&L at expiry with the underlying at `price`.
///
/// # Parameters
/// * `legs` - Trade legs
/// * `net_debit` - Total-dollar entry cost of the same legs
/// * `price` - Settlement price of the underlying
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use strikelab_options::analysis::{net_debit, pnl_at_expiry};
/// use strikelab_options::models::{Action, OptionQuote, OptionType, TradeLeg};
///
/// let expiry = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
/// let call = OptionQuote::new("XYZ", OptionType::Call, 100.0, expiry, 2.9, 3.0);
/// let legs = vec![TradeLeg::option(Action::Buy, 1, call)];
/// let debit = net_debit(&legs);
/// assert!(pnl_at_expiry(&legs, debit, 103.0).abs() < 1e-9);
/// ```
pub fn pnl_at_expiry(legs: &[TradeLeg], net_debit: f64, price: f64) -> f64 {
    legs.iter().fold(-net_debit, |pnl, leg| {
        pnl + leg.action.sign() * leg_value_at_expiry(leg, price)
    })
}

/// Derives the full metrics block for a leg set.
///
/// # Description
/// 1. Net debit from the entry side of the book.
/// 2. Portfolio Greeks from the quoted per-share Greeks.
/// 3. Expiry payoff scan from 0 to `upper_multiple × current_price`:
///    the running max is `max_profit`, the running min (negated, floored at
///    zero) is `max_risk`, and every sign change between adjacent points is
///    interpolated into a break-even rounded to cents.
///
/// `profit_unbounded` is set when P&L still rises over the final step.
pub fn compute_metrics(legs: &[TradeLeg], current_price: f64, config: &ScanConfig) -> TradeMetrics {
    let net_debit = net_debit(legs);
    let greeks = portfolio_greeks(legs);

    let steps = config.steps.max(1);
    let upper = (current_price * config.upper_multiple).max(0.0);
    let step_size = upper / steps as f64;

    let mut max_profit = f64::MIN;
    let mut min_profit = f64::MAX;
    let mut break_evens = Vec::new();
    let mut previous: Option<(f64, f64)> = None;
    let mut last_rise = 0.0;

    for i in 0..=steps {
        let price = i as f64 * step_size;
        let pnl = pnl_at_expiry(legs, net_debit, price);

        max_profit = max_profit.max(pnl);
        min_profit = min_profit.min(pnl);

        if let Some((x1, p1)) = previous {
            if (p1 < 0.0 && pnl >= 0.0) || (p1 >= 0.0 && pnl < 0.0) {
                let be = (x1 - p1 * (price - x1) / (pnl - p1)) * 100.0;
                let be = be.round() / 100.0;
                // P&L touching zero at a scan point crosses twice there.
                if break_evens.last() != Some(&be) {
                    break_evens.push(be);
                }
            }
            last_rise = pnl - p1;
        }
        previous = Some((price, pnl));
    }

    TradeMetrics {
        net_debit,
        max_profit,
        max_risk: (-min_profit).max(0.0),
        break_evens,
        greeks,
        profit_unbounded: last_rise > 1e-9,
    }
}

/// Validates the draft's legs and joins them with freshly computed metrics.
///
/// # Returns
/// The evaluated [`Trade`], or [`OptionsError::InvalidLeg`] for the first
/// leg that breaks the invariants as of `as_of`.
pub fn evaluate(draft: TradeDraft, current_price: f64, as_of: NaiveDate, config: &ScanConfig) -> Result<Trade> {
    for leg in &draft.legs {
        validate_leg(leg, as_of)?;
    }
    let metrics = compute_metrics(&draft.legs, current_price, config);
    Ok(Trade::from_parts(draft, metrics))
}
