//! # Options Pricing Module
//!
//! Black-Scholes valuation, Greeks, implied volatility and probability helpers.
//!
//! ## Description
//! European option pricing under Black-Scholes-Merton (no dividends). The
//! engine is stateless: every function is a pure mapping of its inputs.
//!
//! ## Conventions
//! - Theta is reported per calendar day (annual theta / 365).
//! - Vega is reported per volatility point (raw vega / 100, i.e. 20 → 21).
//!   The implied-volatility solver works with raw vega internally; the two
//!   scales must stay distinct.
//! - Callers apply the [`PricingConfig::time_floor_years`] floor before
//!   pricing; T ≤ 0 or σ ≤ 0 is rejected with [`OptionsError::InvalidInput`].
//!
//! ## References
//! - Black, F., & Scholes, M. (1973). The Pricing of Options and Corporate Liabilities.
//!   Journal of Political Economy, 81(3), 637-654.
//! - Hull, J. (2018). Options, Futures, and Other Derivatives, 10th ed.
//!
//! ## Module Structure
//! - [`black_scholes`] - Price and Greeks for a call or put
//! - [`implied_volatility`] - Newton-Raphson IV solver
//! - [`probability_of_profit`] - Risk-neutral probability of finishing past a break-even
//! - [`return_on_risk_debit`] / [`return_on_risk_credit`] - RoR percentages

use crate::error::{OptionsError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use statrs::function::erf::erf;
use std::f64::consts::{PI, SQRT_2};
use strikelab_models::{expiry_instant, OptionType};
pub use strikelab_models::{return_on_risk_credit, return_on_risk_debit};
use tracing::debug;

/// Calendar days per year used for every time conversion.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Market-environment parameters shared by the pricing call sites.
///
/// # Fields
/// * `risk_free_rate` - Continuously compounded rate (0.05 = 5%).
/// * `time_floor_years` - Minimum time to expiry fed to the model (~8.76 hours).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub risk_free_rate: f64,
    pub time_floor_years: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.05,
            time_floor_years: 0.001,
        }
    }
}

impl PricingConfig {
    /// Years from `as_of` to midnight UTC of `expiry`, floored at the time floor.
    pub fn time_to_expiry(&self, as_of: DateTime<Utc>, expiry: NaiveDate) -> f64 {
        year_fraction(as_of, expiry_instant(expiry)).max(self.time_floor_years)
    }
}

/// Signed year fraction between two instants on a 365-day basis.
pub fn year_fraction(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 86_400.0 / DAYS_PER_YEAR
}

/// Standard normal cumulative distribution Φ(x), via the error function.
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal density φ(x).
pub(crate) fn norm_pdf(x: f64) -> f64 {
    (-(x * x) / 2.0).exp() / (2.0 * PI).sqrt()
}

/// Calculates d₁ and d₂ parameters for Black-Scholes formula.
///
/// - d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// - d₂ = d₁ - σ√T
fn d1_d2(spot: f64, strike: f64, time: f64, rate: f64, volatility: f64) -> (f64, f64) {
    let d1 = ((spot / strike).ln() + (rate + volatility * volatility / 2.0) * time)
             / (volatility * time.sqrt());
    let d2 = d1 - volatility * time.sqrt();
    (d1, d2)
}

/// Theoretical value of one option and its per-share Greeks.
///
/// # Fields
/// * `price` - Premium per share.
/// * `delta` - ∂V/∂S; (0, 1) for calls, (-1, 0) for puts.
/// * `gamma` - ∂²V/∂S², identical for calls and puts.
/// * `theta` - Daily time decay (annual theta / 365).
/// * `vega` - Value change per one volatility point (raw vega / 100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionValuation {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
}

fn check_positive(param: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OptionsError::InvalidInput { param, value })
    }
}

fn check_inputs(spot: f64, strike: f64, time: f64, rate: f64, volatility: f64) -> Result<()> {
    check_positive("spot", spot)?;
    check_positive("strike", strike)?;
    check_positive("time", time)?;
    check_positive("volatility", volatility)?;
    if !rate.is_finite() {
        return Err(OptionsError::InvalidInput { param: "rate", value: rate });
    }
    Ok(())
}

/// Prices a European option and computes its Greeks.
///
/// # Description
/// Closed-form Black-Scholes-Merton without dividends:
/// - Call: C = S·Φ(d₁) − K·e^(−rT)·Φ(d₂)
/// - Put: P = K·e^(−rT)·Φ(−d₂) − S·Φ(−d₁)
///
/// # Parameters
/// * `option_type` - Call or Put
/// * `spot` - Underlying price S, must be positive
/// * `strike` - Strike K, must be positive
/// * `time` - Years to expiry T, must be positive (apply the time floor first)
/// * `rate` - Risk-free rate r
/// * `volatility` - Annualized volatility σ, must be positive
///
/// # Returns
/// [`OptionValuation`] or [`OptionsError::InvalidInput`] when an input is out of domain.
///
/// # Examples
/// ```
/// use strikelab_options::pricing::black_scholes;
/// use strikelab_options::models::OptionType;
///
/// let v = black_scholes(OptionType::Call, 100.0, 100.0, 30.0 / 365.0, 0.05, 0.30).unwrap();
/// assert!((v.price - 3.63).abs() < 0.05);
/// ```
pub fn black_scholes(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    volatility: f64,
) -> Result<OptionValuation> {
    check_inputs(spot, strike, time, rate, volatility)?;

    let (d1, d2) = d1_d2(spot, strike, time, rate, volatility);
    let sqrt_t = time.sqrt();
    let pdf_d1 = norm_pdf(d1);
    let discounted_strike = strike * (-rate * time).exp();
    let decay = -(spot * pdf_d1 * volatility) / (2.0 * sqrt_t);

    let (price, delta, theta_annual) = match option_type {
        OptionType::Call => (
            spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
            norm_cdf(d1),
            decay - rate * discounted_strike * norm_cdf(d2),
        ),
        OptionType::Put => (
            discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
            norm_cdf(d1) - 1.0,
            decay + rate * discounted_strike * norm_cdf(-d2),
        ),
    };

    Ok(OptionValuation {
        price,
        delta,
        gamma: pdf_d1 / (spot * volatility * sqrt_t),
        theta: theta_annual / DAYS_PER_YEAR,
        vega: spot * pdf_d1 * sqrt_t / 100.0,
    })
}

/// Model price and *raw* vega (∂V/∂σ, not divided by 100).
fn price_and_raw_vega(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    volatility: f64,
) -> (f64, f64) {
    let (d1, d2) = d1_d2(spot, strike, time, rate, volatility);
    let discounted_strike = strike * (-rate * time).exp();
    let price = match option_type {
        OptionType::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    };
    (price, spot * norm_pdf(d1) * time.sqrt())
}

/// Outcome of the implied-volatility search.
///
/// `converged == false` means the iteration budget ran out or vega vanished;
/// `volatility` is then the last estimate and should be treated as approximate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IvSolution {
    pub volatility: f64,
    pub iterations: u32,
    pub converged: bool,
}

const IV_INITIAL_GUESS: f64 = 0.5;
const IV_TOLERANCE: f64 = 1e-5;
const IV_MAX_ITERATIONS: u32 = 100;
const IV_MAX_VOLATILITY: f64 = 5.0;

/// Solves for the volatility that reproduces `market_price`.
///
/// # Description
/// Newton-Raphson on σ starting at 0.5: σₙ₊₁ = σₙ + (P_mkt − P(σₙ)) / vega_raw(σₙ).
/// Stops when |P_mkt − P(σₙ)| < 1e-5, when raw vega is exactly zero, or after
/// 100 iterations. A step that would leave (0, 5] is replaced by halving the
/// distance to that bound so the model is never evaluated at σ ≤ 0.
///
/// # Parameters
/// * `market_price` - Observed premium per share
/// * `option_type` - Call or Put
/// * `spot` / `strike` / `time` / `rate` - As for [`black_scholes`]
///
/// # Returns
/// [`IvSolution`]; non-convergence is reported, not raised.
///
/// # Examples
/// ```
/// use strikelab_options::pricing::{black_scholes, implied_volatility};
/// use strikelab_options::models::OptionType;
///
/// let price = black_scholes(OptionType::Put, 100.0, 95.0, 0.5, 0.05, 0.32).unwrap().price;
/// let iv = implied_volatility(price, OptionType::Put, 100.0, 95.0, 0.5, 0.05).unwrap();
/// assert!(iv.converged);
/// assert!((iv.volatility - 0.32).abs() < 1e-4);
/// ```
pub fn implied_volatility(
    market_price: f64,
    option_type: OptionType,
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
) -> Result<IvSolution> {
    check_inputs(spot, strike, time, rate, IV_INITIAL_GUESS)?;
    if !market_price.is_finite() {
        return Err(OptionsError::InvalidInput { param: "market_price", value: market_price });
    }

    let mut vol = IV_INITIAL_GUESS;

    for iteration in 0..IV_MAX_ITERATIONS {
        let (price, raw_vega) = price_and_raw_vega(option_type, spot, strike, time, rate, vol);
        let diff = market_price - price;

        if diff.abs() < IV_TOLERANCE {
            return Ok(IvSolution { volatility: vol, iterations: iteration, converged: true });
        }

        if raw_vega == 0.0 {
            debug!(vol, iteration, "IV search stopped on zero vega");
            return Ok(IvSolution { volatility: vol, iterations: iteration, converged: false });
        }

        let next = vol + diff / raw_vega;
        vol = if next <= 0.0 {
            vol / 2.0
        } else if next > IV_MAX_VOLATILITY {
            (vol + IV_MAX_VOLATILITY) / 2.0
        } else {
            next
        };
    }

    debug!(vol, "IV search exhausted its iteration budget");
    Ok(IvSolution { volatility: vol, iterations: IV_MAX_ITERATIONS, converged: false })
}

/// Probability that the underlying finishes beyond `break_even`.
///
/// # Description
/// Drift-free risk-neutral approximation:
/// d = [ln(BE/S) − (σ²/2)T] / (σ√T), PoP = 1 − Φ(d).
///
/// # Returns
/// Probability in [0, 1]; 0 when T ≤ 0, σ ≤ 0, S ≤ 0 or BE < 0.
pub fn probability_of_profit(break_even: f64, spot: f64, time: f64, volatility: f64) -> f64 {
    if time <= 0.0 || volatility <= 0.0 || spot <= 0.0 || break_even < 0.0 {
        return 0.0;
    }
    let d = ((break_even / spot).ln() - (volatility * volatility / 2.0) * time)
            / (volatility * time.sqrt());
    1.0 - norm_cdf(d)
}
