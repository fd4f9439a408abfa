//! # Profit Matrix Module
//!
//! Time × price grid of projected P&L for a trade.
//!
//! ## Description
//! Revalues every leg of a trade on a grid of simulated dates (from tomorrow
//! to the latest leg expiry) and underlying prices (a band around the
//! current price). Legs that have expired by a simulated date are worth their
//! intrinsic value; live legs are priced with Black-Scholes using their own
//! implied volatility, falling back to the ambient volatility. Each cell also
//! carries a z-score: how many standard deviations the price sits from the
//! current price over the time elapsed to that date.
//!
//! The grid is always fully populated: degenerate inputs are absorbed by
//! floors and fallbacks rather than errors.
//!
//! ## Units
//! Cell profit is total dollars: `Σ sign × value × units − net_debit`, the
//! same scaling the metrics analyzer uses at expiry.

use crate::pricing::{black_scholes, year_fraction};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strikelab_models::{expiry_instant, Instrument, MatrixPoint, Trade, TradeLeg};
use tracing::debug;

/// Grid geometry and the rate used for revaluation.
///
/// # Fields
/// * `time_slices` - Number of simulated dates, start and expiry inclusive.
/// * `price_points` - Number of prices across the band, ends inclusive.
/// * `price_band` - Half-width of the price band as a fraction of current price.
/// * `risk_free_rate` - Rate used when revaluing live legs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub time_slices: usize,
    pub price_points: usize,
    pub price_band: f64,
    pub risk_free_rate: f64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            time_slices: 8,
            price_points: 21,
            price_band: 0.20,
            risk_free_rate: 0.05,
        }
    }
}

const FALLBACK_HORIZON_DAYS: i64 = 30;
const MIN_SPAN_DAYS: f64 = 0.01;

fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// Simulated dates from tomorrow (or now, if tomorrow is past expiry) to expiry.
fn time_axis(trade: &Trade, as_of: DateTime<Utc>, slices: usize) -> Vec<DateTime<Utc>> {
    let expiry = trade
        .latest_expiry()
        .map(expiry_instant)
        .unwrap_or_else(|| as_of + Duration::days(FALLBACK_HORIZON_DAYS));

    let tomorrow = as_of + Duration::days(1);
    let start = if tomorrow > expiry { as_of } else { tomorrow };

    let mut total_days = (expiry - start).num_milliseconds() as f64 / 86_400_000.0;
    if total_days <= 0.0 {
        total_days = MIN_SPAN_DAYS;
    }

    if slices <= 1 {
        return vec![expiry];
    }
    let step_days = total_days / (slices - 1) as f64;

    (0..slices)
        .map(|i| {
            if i == slices - 1 {
                return expiry.max(start);
            }
            let offset = Duration::milliseconds((i as f64 * step_days * 86_400_000.0).round() as i64);
            (start + offset).min(expiry.max(start))
        })
        .collect()
}

/// Evenly spaced prices across `[1 - band, 1 + band] × current_price`.
fn price_axis(current_price: f64, points: usize, band: f64) -> Vec<f64> {
    let low = current_price * (1.0 - band);
    let high = current_price * (1.0 + band);
    if points <= 1 {
        return vec![current_price];
    }
    let step = (high - low) / (points - 1) as f64;
    (0..points).map(|i| low + i as f64 * step).collect()
}

/// Unsigned total-dollar value of one leg on `date` with the underlying at `price`.
fn leg_value(leg: &TradeLeg, price: f64, date: DateTime<Utc>, volatility: f64, rate: f64) -> f64 {
    let quote = match &leg.instrument {
        Instrument::Stock { .. } => return price * leg.units(),
        Instrument::Option(q) => q,
    };

    let remaining = year_fraction(date, quote.expiry_instant());
    let sigma = if quote.implied_vol > 0.0 { quote.implied_vol } else { volatility };

    let per_share = if remaining <= 0.0 || sigma <= 0.0 {
        quote.intrinsic(price)
    } else {
        black_scholes(quote.option_type, price, quote.strike, remaining, rate, sigma)
            .map(|v| v.price)
            .unwrap_or_else(|_| quote.intrinsic(price))
    };
    per_share * leg.units()
}

/// Projects the P&L surface of a trade.
///
/// # Parameters
/// * `trade` - Evaluated trade; its `net_debit` is the entry cost
/// * `current_price` - Underlying price now; centre of the price band
/// * `volatility` - Ambient volatility for legs without IV and for z-scores
/// * `as_of` - Simulation start instant
/// * `config` - Grid geometry
///
/// # Returns
/// `time_slices × price_points` points, grouped by date in ascending order
/// with prices ascending inside each group. Price and profit are rounded to
/// cents, z-score to 3 decimals.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use strikelab_options::matrix::{calculate_profit_matrix, MatrixConfig};
/// use strikelab_options::models::{Sentiment, Trade, TradeDraft, TradeMetrics};
///
/// let empty = Trade::from_parts(TradeDraft::new("Empty", Sentiment::Neutral, vec![]), TradeMetrics::default());
/// let grid = calculate_profit_matrix(&empty, 100.0, 0.25, Utc::now(), &MatrixConfig::default());
/// assert_eq!(grid.len(), 8 * 21);
/// ```
pub fn calculate_profit_matrix(
    trade: &Trade,
    current_price: f64,
    volatility: f64,
    as_of: DateTime<Utc>,
    config: &MatrixConfig,
) -> Vec<MatrixPoint> {
    let dates = time_axis(trade, as_of, config.time_slices);
    let prices = price_axis(current_price, config.price_points, config.price_band);
    let net_debit = trade.net_debit();

    let mut grid = Vec::with_capacity(dates.len() * prices.len());
    for &date in &dates {
        let elapsed = year_fraction(as_of, date).max(0.0);
        let denom = current_price * volatility * elapsed.sqrt();

        for &price in &prices {
            let gross: f64 = trade
                .legs()
                .iter()
                .map(|leg| leg.action.sign() * leg_value(leg, price, date, volatility, config.risk_free_rate))
                .sum();

            let z_score = if denom > 0.0 { (price - current_price) / denom } else { 0.0 };

            grid.push(MatrixPoint {
                date: date.date_naive(),
                price: round_to(price, 2),
                profit: round_to(gross - net_debit, 2),
                z_score: round_to(z_score, 3),
            });
        }
    }

    debug!("Profit matrix for {}: {} dates x {} prices", trade.name, dates.len(), prices.len());
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{compute_metrics, pnl_at_expiry, ScanConfig};
    use chrono::{NaiveDate, TimeZone};
    use strikelab_models::{Action, OptionQuote, OptionType, Sentiment, TradeDraft, TradeMetrics};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap()
    }

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 20).unwrap()
    }

    fn trade(legs: Vec<TradeLeg>) -> Trade {
        let metrics = compute_metrics(&legs, 100.0, &ScanConfig::default());
        Trade::from_parts(TradeDraft::new("Test", Sentiment::Neutral, legs), metrics)
    }

    fn long_call() -> Trade {
        let quote = OptionQuote::new("XYZ", OptionType::Call, 100.0, expiry(), 3.9, 4.1).with_iv(0.3);
        trade(vec![TradeLeg::option(Action::Buy, 1, quote)])
    }

    #[test]
    fn test_grid_shape_and_axes() {
        let grid = calculate_profit_matrix(&long_call(), 100.0, 0.3, as_of(), &MatrixConfig::default());
        assert_eq!(grid.len(), 168);

        for group in grid.chunks(21) {
            assert!(group.iter().all(|p| p.date == group[0].date));
            assert!(group.windows(2).all(|w| w[1].price > w[0].price), "Prices must increase");
            assert_eq!(group[0].price, 80.0);
            assert_eq!(group[20].price, 120.0);
        }
        assert_eq!(grid[0].date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(grid[167].date, expiry());
    }

    #[test]
    fn test_expiry_slice_matches_expiry_payoff() {
        let t = long_call();
        let grid = calculate_profit_matrix(&t, 100.0, 0.3, as_of(), &MatrixConfig::default());
        for point in &grid[147..] {
            let expected = pnl_at_expiry(t.legs(), t.net_debit(), point.price);
            assert!((point.profit - expected).abs() < 0.01, "{} vs {}", point.profit, expected);
        }
    }

    #[test]
    fn test_entry_cost_scaled_like_exit_value() {
        // Bought at 4.10 with model value ~4: first-day ATM profit is a small loss, not ~-410 or ~+390.
        let grid = calculate_profit_matrix(&long_call(), 100.0, 0.3, as_of(), &MatrixConfig::default());
        let atm = grid[10];
        assert_eq!(atm.price, 100.0);
        assert!(atm.profit > -100.0 && atm.profit < 50.0, "ATM day-one profit {}", atm.profit);
    }

    #[test]
    fn test_stock_leg_value_unscaled() {
        let quote = OptionQuote::new("XYZ", OptionType::Call, 105.0, expiry(), 1.5, 1.6).with_iv(0.25);
        let covered = trade(vec![
            TradeLeg::stock(Action::Buy, 100, 100.0),
            TradeLeg::option(Action::Sell, 1, quote),
        ]);
        let grid = calculate_profit_matrix(&covered, 100.0, 0.25, as_of(), &MatrixConfig::default());
        let last = grid[167];
        assert_eq!(last.price, 120.0);
        assert!((last.profit - 650.0).abs() < 0.01, "Capped at 5 × 100 + 150: {}", last.profit);
    }

    #[test]
    fn test_z_scores() {
        let grid = calculate_profit_matrix(&long_call(), 100.0, 0.3, as_of(), &MatrixConfig::default());
        assert_eq!(grid[10].z_score, 0.0);
        assert!(grid[0].z_score < 0.0 && grid[20].z_score > 0.0);
        // Wider dispersion later: the same price move is fewer standard deviations.
        assert!(grid[167].z_score < grid[20].z_score);
    }

    #[test]
    fn test_empty_trade_still_fills_grid() {
        let empty = Trade::from_parts(TradeDraft::new("Empty", Sentiment::Neutral, vec![]), TradeMetrics::default());
        let grid = calculate_profit_matrix(&empty, 50.0, 0.2, as_of(), &MatrixConfig::default());
        assert_eq!(grid.len(), 168);
        assert!(grid.iter().all(|p| p.profit == 0.0));
        assert_eq!(grid[167].date, NaiveDate::from_ymd_opt(2026, 11, 17).unwrap());
    }

    #[test]
    fn test_expiring_today_collapses_to_now() {
        let quote = OptionQuote::new("XYZ", OptionType::Put, 100.0, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), 0.5, 0.6);
        let t = trade(vec![TradeLeg::option(Action::Buy, 1, quote)]);
        let grid = calculate_profit_matrix(&t, 100.0, 0.0, as_of(), &MatrixConfig::default());
        assert_eq!(grid.len(), 168);
        // Zero volatility: no z-scores, legs priced at intrinsic.
        assert!(grid.iter().all(|p| p.z_score == 0.0));
        assert!((grid[0].profit - (20.0 * 100.0 - 60.0)).abs() < 0.01);
    }
}
