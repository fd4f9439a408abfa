//! # Options Strategy Module
//!
//! Fixed catalogue of named multi-leg recipes built from a chain snapshot.
//!
//! ## Description
//! Each [`StrategyKind`] is a self-contained recipe that picks its strikes
//! from a single-expiry chain with the shared selection primitives
//! ([`OptionChain::nearest_strike`], [`OptionChain::nth_otm`],
//! [`OptionChain::nth_itm`]) and returns `None` when the chain lacks a
//! required strike. [`generate_strategies`] runs the whole catalogue,
//! evaluates every feasible draft and annotates it with its expiration.
//!
//! ## Catalogue
//! | Strategy | Sentiment | Legs |
//! |----------|-----------|------|
//! | Long Call / Long Put | Bullish / Bearish | strike nearest the target |
//! | Covered Call | Bullish | +100 shares, -1 1st OTM call |
//! | Cash-Secured Put | Bullish | -1 1st OTM put |
//! | Bull Call Spread | Bullish | +1st ITM call, -1st OTM call |
//! | Bull Put Spread | Bullish | -1st OTM put, +3rd OTM put |
//! | Bear Call Spread | Bearish | -1st ITM call, +1st OTM call |
//! | Bear Put Spread | Bearish | +1st ITM put, -1st OTM put |
//! | Straddle | Neutral | +ATM call, +put at the same strike |
//! | Strangle | Neutral | +1st OTM call, +1st OTM put |
//! | Iron Condor | Neutral | -1st OTM put/call, +3rd OTM put/call |
//! | Iron Butterfly | Neutral | -ATM put/call, +2nd OTM put/call |
//! | Call Broken Wing Butterfly | Bullish | +1st ITM, -2 ATM, +2nd OTM calls |
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use crate::analysis::{evaluate, ScanConfig};
use crate::chain::OptionChain;
use crate::error::{OptionsError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strikelab_models::{expiry_instant, Action, OptionQuote, OptionType, Sentiment, Trade, TradeDraft, TradeLeg};
use tracing::{debug, info, warn};

/// Classification of the supported multi-leg patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    LongCall,
    LongPut,
    CoveredCall,
    CashSecuredPut,
    BullCallSpread,
    BullPutSpread,
    BearCallSpread,
    BearPutSpread,
    Straddle,
    Strangle,
    IronCondor,
    IronButterfly,
    /// Asymmetric wings: 1st ITM and 2nd OTM around a short ATM pair.
    CallBrokenWingButterfly,
}

/// Prices the recipes anchor on.
#[derive(Debug, Clone, Copy)]
struct Anchors {
    /// Current underlying price; defines ATM, ITM and OTM.
    price: f64,
    /// Strike the single-leg recipes aim for.
    target: f64,
}

fn buy(quantity: u32, quote: &OptionQuote) -> TradeLeg {
    TradeLeg::option(Action::Buy, quantity, quote.clone())
}

fn sell(quantity: u32, quote: &OptionQuote) -> TradeLeg {
    TradeLeg::option(Action::Sell, quantity, quote.clone())
}

impl StrategyKind {
    /// Catalogue order; also the order of [`generate_strategies`] output.
    pub const ALL: [StrategyKind; 13] = [
        StrategyKind::LongCall,
        StrategyKind::LongPut,
        StrategyKind::CoveredCall,
        StrategyKind::CashSecuredPut,
        StrategyKind::BullCallSpread,
        StrategyKind::BullPutSpread,
        StrategyKind::BearCallSpread,
        StrategyKind::BearPutSpread,
        StrategyKind::Straddle,
        StrategyKind::Strangle,
        StrategyKind::IronCondor,
        StrategyKind::IronButterfly,
        StrategyKind::CallBrokenWingButterfly,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::LongCall => "Long Call",
            StrategyKind::LongPut => "Long Put",
            StrategyKind::CoveredCall => "Covered Call",
            StrategyKind::CashSecuredPut => "Cash-Secured Put",
            StrategyKind::BullCallSpread => "Bull Call Spread",
            StrategyKind::BullPutSpread => "Bull Put Spread",
            StrategyKind::BearCallSpread => "Bear Call Spread",
            StrategyKind::BearPutSpread => "Bear Put Spread",
            StrategyKind::Straddle => "Straddle",
            StrategyKind::Strangle => "Strangle",
            StrategyKind::IronCondor => "Iron Condor",
            StrategyKind::IronButterfly => "Iron Butterfly",
            StrategyKind::CallBrokenWingButterfly => "Call Broken Wing Butterfly",
        }
    }

    /// Declared directional bias, used by the sentiment filter.
    pub fn sentiment(&self) -> Sentiment {
        match self {
            StrategyKind::LongCall
            | StrategyKind::CoveredCall
            | StrategyKind::CashSecuredPut
            | StrategyKind::BullCallSpread
            | StrategyKind::BullPutSpread
            | StrategyKind::CallBrokenWingButterfly => Sentiment::Bullish,
            StrategyKind::LongPut
            | StrategyKind::BearCallSpread
            | StrategyKind::BearPutSpread => Sentiment::Bearish,
            StrategyKind::Straddle
            | StrategyKind::Strangle
            | StrategyKind::IronCondor
            | StrategyKind::IronButterfly => Sentiment::Neutral,
        }
    }

    /// Builds the leg set from a single-expiry chain.
    ///
    /// # Parameters
    /// * `chain` - Quotes for one expiration
    /// * `current_price` - Underlying price defining ATM/ITM/OTM
    /// * `target_strike` - Strike the Long Call / Long Put recipes aim for
    ///
    /// # Returns
    /// `None` if the chain lacks a strike the recipe needs.
    pub fn build(&self, chain: &OptionChain, current_price: f64, target_strike: f64) -> Option<TradeDraft> {
        let at = Anchors { price: current_price, target: target_strike };
        let (legs, description) = match self {
            StrategyKind::LongCall => {
                let call = chain.nearest_strike(at.target, OptionType::Call)?;
                (vec![buy(1, call)], format!("Buy 1 Call at Strike {:.2}", call.strike))
            }
            StrategyKind::LongPut => {
                let put = chain.nearest_strike(at.target, OptionType::Put)?;
                (vec![buy(1, put)], format!("Buy 1 Put at Strike {:.2}", put.strike))
            }
            StrategyKind::CoveredCall => {
                let call = chain.nth_otm(at.price, OptionType::Call, 1)?;
                (
                    vec![TradeLeg::stock(Action::Buy, 100, at.price), sell(1, call)],
                    format!("Buy 100 Shares + Sell 1 Call at Strike {:.2}", call.strike),
                )
            }
            StrategyKind::CashSecuredPut => {
                let put = chain.nth_otm(at.price, OptionType::Put, 1)?;
                (vec![sell(1, put)], format!("Sell 1 Put at Strike {:.2}", put.strike))
            }
            StrategyKind::BullCallSpread => {
                let long = chain.nth_itm(at.price, OptionType::Call, 1)?;
                let short = chain.nth_otm(at.price, OptionType::Call, 1)?;
                (
                    vec![buy(1, long), sell(1, short)],
                    format!("Buy Call {:.2}, Sell Call {:.2}", long.strike, short.strike),
                )
            }
            StrategyKind::BullPutSpread => {
                let short = chain.nth_otm(at.price, OptionType::Put, 1)?;
                let long = chain.nth_otm(at.price, OptionType::Put, 3)?;
                (
                    vec![sell(1, short), buy(1, long)],
                    format!("Sell Put {:.2}, Buy Put {:.2}", short.strike, long.strike),
                )
            }
            StrategyKind::BearCallSpread => {
                let short = chain.nth_itm(at.price, OptionType::Call, 1)?;
                let long = chain.nth_otm(at.price, OptionType::Call, 1)?;
                (
                    vec![sell(1, short), buy(1, long)],
                    format!("Sell Call {:.2}, Buy Call {:.2}", short.strike, long.strike),
                )
            }
            StrategyKind::BearPutSpread => {
                let long = chain.nth_itm(at.price, OptionType::Put, 1)?;
                let short = chain.nth_otm(at.price, OptionType::Put, 1)?;
                (
                    vec![buy(1, long), sell(1, short)],
                    format!("Buy Put {:.2}, Sell Put {:.2}", long.strike, short.strike),
                )
            }
            StrategyKind::Straddle => {
                let (call, put) = atm_pair(chain, at.price)?;
                (
                    vec![buy(1, call), buy(1, put)],
                    format!("Buy Call & Put at Strike {:.2}", call.strike),
                )
            }
            StrategyKind::Strangle => {
                let call = chain.nth_otm(at.price, OptionType::Call, 1)?;
                let put = chain.nth_otm(at.price, OptionType::Put, 1)?;
                (
                    vec![buy(1, call), buy(1, put)],
                    format!("Buy Call {:.2}, Buy Put {:.2}", call.strike, put.strike),
                )
            }
            StrategyKind::IronCondor => {
                let short_put = chain.nth_otm(at.price, OptionType::Put, 1)?;
                let long_put = chain.nth_otm(at.price, OptionType::Put, 3)?;
                let short_call = chain.nth_otm(at.price, OptionType::Call, 1)?;
                let long_call = chain.nth_otm(at.price, OptionType::Call, 3)?;
                (
                    vec![sell(1, short_put), buy(1, long_put), sell(1, short_call), buy(1, long_call)],
                    format!(
                        "Sell Put {:.2}/Call {:.2}, Buy Put {:.2}/Call {:.2}",
                        short_put.strike, short_call.strike, long_put.strike, long_call.strike
                    ),
                )
            }
            StrategyKind::IronButterfly => {
                let (atm_call, atm_put) = atm_pair(chain, at.price)?;
                let wing_call = chain.nth_otm(at.price, OptionType::Call, 2)?;
                let wing_put = chain.nth_otm(at.price, OptionType::Put, 2)?;
                (
                    vec![sell(1, atm_put), sell(1, atm_call), buy(1, wing_put), buy(1, wing_call)],
                    format!(
                        "Sell ATM {:.2}, Buy OTM Call {:.2}/Put {:.2}",
                        atm_call.strike, wing_call.strike, wing_put.strike
                    ),
                )
            }
            StrategyKind::CallBrokenWingButterfly => {
                let lower = chain.nth_itm(at.price, OptionType::Call, 1)?;
                let body = chain.nearest_strike(at.price, OptionType::Call)?;
                let upper = chain.nth_otm(at.price, OptionType::Call, 2)?;
                (
                    vec![buy(1, lower), sell(2, body), buy(1, upper)],
                    format!("Buy {:.2}, Sell 2x {:.2}, Buy {:.2}", lower.strike, body.strike, upper.strike),
                )
            }
        };

        Some(TradeDraft::new(self.name(), self.sentiment(), legs).with_description(description))
    }

    /// [`StrategyKind::build`] with infeasibility reported as an error.
    pub fn try_build(&self, chain: &OptionChain, current_price: f64, target_strike: f64) -> Result<TradeDraft> {
        self.build(chain, current_price, target_strike)
            .ok_or_else(|| OptionsError::InfeasibleStrategy(self.name().to_string()))
    }
}

/// ATM call and a put at exactly the same strike.
///
/// If the nearest put sits on a different strike the put is re-anchored to
/// the call's strike; no put there means no pair.
fn atm_pair(chain: &OptionChain, price: f64) -> Option<(&OptionQuote, &OptionQuote)> {
    let call = chain.nearest_strike(price, OptionType::Call)?;
    let put = chain.nearest_strike(price, OptionType::Put)?;
    if put.strike == call.strike {
        return Some((call, put));
    }
    let put = chain.at_strike(call.strike, OptionType::Put)?;
    Some((call, put))
}

/// Parameters of a strategy-generation request.
///
/// # Fields
/// * `target_strike` - Strike for single-leg recipes; defaults to the current price.
/// * `target_expiry` - Expiration to aim for; the chain is narrowed to the
///   closest listed date. Without it the earliest live expiration is used.
/// * `sentiment` - Loose sentiment filter (`bullish`, `very_bearish`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyRequest {
    pub target_strike: Option<f64>,
    pub target_expiry: Option<NaiveDate>,
    pub sentiment: Option<String>,
}

/// "Nov 17 (30d)": the expiry date and the ceiling of days until midnight UTC.
pub fn expiry_label(expiry: NaiveDate, as_of: DateTime<Utc>) -> String {
    let seconds = (expiry_instant(expiry) - as_of).num_seconds() as f64;
    let days = (seconds / 86_400.0).ceil() as i64;
    format!("{} ({}d)", expiry.format("%b %d"), days)
}

/// Builds, evaluates and annotates every feasible strategy in the catalogue.
///
/// # Description
/// 1. Narrows the chain to one expiration (closest to `target_expiry`, or
///    the earliest not before `as_of`).
/// 2. Runs each recipe whose sentiment passes the filter; infeasible
///    recipes are skipped.
/// 3. Evaluates each draft via [`evaluate`] and stamps the expiration date
///    and label.
///
/// # Returns
/// Trades in catalogue order, or [`OptionsError::EmptyChain`] when no quotes
/// remain after expiry filtering.
pub fn generate_strategies(
    chain: &OptionChain,
    current_price: f64,
    request: &StrategyRequest,
    as_of: DateTime<Utc>,
    scan: &ScanConfig,
) -> Result<Vec<Trade>> {
    let today = as_of.date_naive();
    let expiry = match request.target_expiry {
        Some(target) => chain.closest_live_expiry(target, today),
        None => chain.expiries().into_iter().find(|e| *e >= today),
    };
    let filtered = match expiry {
        Some(expiry) => chain.for_expiry(expiry),
        None => OptionChain::new(chain.underlying.clone(), chain.spot_price, Vec::new()),
    };
    let Some(expiry) = expiry.filter(|_| !filtered.is_empty()) else {
        return Err(OptionsError::EmptyChain {
            underlying: chain.underlying.clone(),
            target: request.target_expiry,
        });
    };

    let filter = request.sentiment.as_deref().and_then(|raw| {
        let normalized = Sentiment::normalize(raw);
        if normalized.is_none() && !raw.trim().is_empty() {
            warn!("Unknown sentiment '{}', returning all strategies", raw);
        }
        normalized
    });
    let target_strike = request.target_strike.unwrap_or(current_price);
    let label = expiry_label(expiry, as_of);

    let mut trades = Vec::new();
    for kind in StrategyKind::ALL {
        if filter.is_some_and(|s| s != kind.sentiment()) {
            continue;
        }
        let draft = match kind.try_build(&filtered, current_price, target_strike) {
            Ok(draft) => draft,
            Err(e) => {
                debug!("Skipping {} for {}: {}", kind.name(), expiry, e);
                continue;
            }
        };
        match evaluate(draft, current_price, today, scan) {
            Ok(mut trade) => {
                trade.expiration_date = Some(expiry);
                trade.expiry_label = Some(label.clone());
                trades.push(trade);
            }
            Err(e) => warn!("Discarding {}: {}", kind.name(), e),
        }
    }

    info!("Built {} strategies for {} expiring {}", trades.len(), chain.underlying, expiry);
    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingConfig;
    use crate::synthetic::{synthetic_chain, SyntheticConfig};
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap()
    }

    fn chain(spot: f64) -> OptionChain {
        let config = SyntheticConfig { expiry_days: vec![33], ..Default::default() };
        synthetic_chain("XYZ", spot, as_of(), &config, &PricingConfig::default()).unwrap()
    }

    fn names(trades: &[Trade]) -> Vec<&str> {
        trades.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_full_catalogue_on_deep_chain() {
        let trades = generate_strategies(&chain(103.0), 103.0, &StrategyRequest::default(), as_of(), &ScanConfig::default()).unwrap();
        let expected: Vec<&str> = StrategyKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names(&trades), expected);

        for trade in &trades {
            assert_eq!(trade.expiry_label.as_deref(), Some("Nov 20 (33d)"));
            assert!(!trade.description.is_empty());
        }
    }

    #[test]
    fn test_recipe_strike_selection() {
        let c = chain(101.0);
        let bull_call = StrategyKind::BullCallSpread.build(&c, 101.0, 101.0).unwrap();
        assert_eq!(bull_call.description, "Buy Call 100.00, Sell Call 105.00");

        let bull_put = StrategyKind::BullPutSpread.build(&c, 101.0, 101.0).unwrap();
        assert_eq!(bull_put.description, "Sell Put 100.00, Buy Put 90.00");

        let condor = StrategyKind::IronCondor.build(&c, 101.0, 101.0).unwrap();
        let strikes: Vec<f64> = condor.legs.iter().map(|l| l.quote().unwrap().strike).collect();
        assert_eq!(strikes, vec![100.0, 90.0, 105.0, 115.0]);

        let bwb = StrategyKind::CallBrokenWingButterfly.build(&c, 103.0, 103.0).unwrap();
        assert_eq!(bwb.description, "Buy 100.00, Sell 2x 105.00, Buy 110.00");
        assert_eq!(bwb.legs[1].quantity, 2);

        let covered = StrategyKind::CoveredCall.build(&c, 101.0, 101.0).unwrap();
        assert!(covered.legs[0].is_stock());
        assert_eq!(covered.legs[0].quantity, 100);
        assert_eq!(covered.description, "Buy 100 Shares + Sell 1 Call at Strike 105.00");

        let csp = StrategyKind::CashSecuredPut.build(&c, 101.0, 101.0).unwrap();
        assert_eq!(csp.description, "Sell 1 Put at Strike 100.00");
        assert_eq!(csp.legs[0].action, Action::Sell);

        let bear_call = StrategyKind::BearCallSpread.build(&c, 101.0, 101.0).unwrap();
        assert_eq!(bear_call.description, "Sell Call 100.00, Buy Call 105.00");
        assert_eq!(bear_call.legs[0].action, Action::Sell);

        let bear_put = StrategyKind::BearPutSpread.build(&c, 101.0, 101.0).unwrap();
        assert_eq!(bear_put.description, "Buy Put 105.00, Sell Put 100.00");
        assert_eq!(bear_put.legs[0].action, Action::Buy);

        let strangle = StrategyKind::Strangle.build(&c, 101.0, 101.0).unwrap();
        assert_eq!(strangle.description, "Buy Call 105.00, Buy Put 100.00");

        let fly = StrategyKind::IronButterfly.build(&c, 101.0, 101.0).unwrap();
        let strikes: Vec<f64> = fly.legs.iter().map(|l| l.quote().unwrap().strike).collect();
        assert_eq!(strikes, vec![100.0, 100.0, 95.0, 110.0]);
    }

    #[test]
    fn test_broken_wing_butterfly_body_on_itm_strike() {
        // Just above a strike the ATM body and the ITM wing share 100; the trade is still built.
        let c = chain(101.0);
        for price in [100.5, 101.0, 101.5, 102.0, 102.4] {
            let bwb = StrategyKind::CallBrokenWingButterfly.build(&c, price, price);
            assert!(bwb.is_some(), "Broken wing butterfly missing at {}", price);
        }
        let bwb = StrategyKind::CallBrokenWingButterfly.build(&c, 101.0, 101.0).unwrap();
        assert_eq!(bwb.description, "Buy 100.00, Sell 2x 100.00, Buy 110.00");
        assert_eq!(bwb.legs.len(), 3);
    }

    #[test]
    fn test_long_call_targets_requested_strike() {
        let request = StrategyRequest { target_strike: Some(112.0), ..Default::default() };
        let trades = generate_strategies(&chain(101.0), 101.0, &request, as_of(), &ScanConfig::default()).unwrap();
        let long_call = trades.iter().find(|t| t.name == "Long Call").unwrap();
        assert_eq!(long_call.legs()[0].quote().unwrap().strike, 110.0);
    }

    #[test]
    fn test_sentiment_filter() {
        let run = |s: &str| {
            let request = StrategyRequest { sentiment: Some(s.to_string()), ..Default::default() };
            generate_strategies(&chain(103.0), 103.0, &request, as_of(), &ScanConfig::default()).unwrap()
        };

        let bullish = run("very_bullish");
        assert_eq!(bullish.len(), 6);
        assert!(bullish.iter().all(|t| t.sentiment == Sentiment::Bullish));
        assert_eq!(run("bearish").len(), 3);
        assert_eq!(names(&run("neutral")), vec!["Straddle", "Strangle", "Iron Condor", "Iron Butterfly"]);
        assert_eq!(run("sideways").len(), 13, "Unknown sentiment means no filter");
    }

    #[test]
    fn test_straddle_needs_matching_put() {
        let c = chain(100.0);
        let quotes: Vec<OptionQuote> = c
            .quotes()
            .iter()
            .filter(|q| !(q.option_type == OptionType::Put && q.strike == 100.0))
            .cloned()
            .collect();
        let thin = OptionChain::new("XYZ", 100.0, quotes);
        assert!(StrategyKind::Straddle.build(&thin, 100.0, 100.0).is_none());
        assert!(StrategyKind::IronButterfly.build(&thin, 100.0, 100.0).is_none());
        assert_eq!(
            StrategyKind::Straddle.try_build(&thin, 100.0, 100.0),
            Err(OptionsError::InfeasibleStrategy("Straddle".to_string()))
        );

        let straddle = StrategyKind::Straddle.build(&c, 100.0, 100.0).unwrap();
        assert_eq!(straddle.description, "Buy Call & Put at Strike 100.00");
    }

    #[test]
    fn test_thin_chain_omits_wide_recipes() {
        let c = chain(100.0);
        let quotes: Vec<OptionQuote> = c
            .quotes()
            .iter()
            .filter(|q| q.strike >= 95.0 && q.strike <= 105.0)
            .cloned()
            .collect();
        let thin = OptionChain::new("XYZ", 100.0, quotes);
        let trades = generate_strategies(&thin, 100.0, &StrategyRequest::default(), as_of(), &ScanConfig::default()).unwrap();
        let built = names(&trades);
        assert!(!built.contains(&"Iron Condor"));
        assert!(!built.contains(&"Bull Put Spread"));
        assert!(built.contains(&"Straddle"));
        assert!(built.contains(&"Bull Call Spread"));
    }

    #[test]
    fn test_expiry_selection() {
        let config = SyntheticConfig { expiry_days: vec![7, 33, 63], ..Default::default() };
        let multi = synthetic_chain("XYZ", 100.0, as_of(), &config, &PricingConfig::default()).unwrap();

        let target = NaiveDate::from_ymd_opt(2026, 12, 15).unwrap();
        let request = StrategyRequest { target_expiry: Some(target), ..Default::default() };
        let trades = generate_strategies(&multi, 100.0, &request, as_of(), &ScanConfig::default()).unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 12, 20).unwrap();
        assert!(trades.iter().all(|t| t.expiration_date == Some(expected)));
        assert!(trades.iter().all(|t| t.legs().iter().filter_map(TradeLeg::expiry).all(|e| e == expected)));

        let nearest = generate_strategies(&multi, 100.0, &StrategyRequest::default(), as_of(), &ScanConfig::default()).unwrap();
        assert_eq!(nearest[0].expiration_date, NaiveDate::from_ymd_opt(2026, 10, 25));
    }

    #[test]
    fn test_target_expiry_skips_expired_dates() {
        let past = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let live = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
        let mut quotes = Vec::new();
        for expiry in [past, live] {
            for strike in [95.0, 100.0, 105.0, 110.0] {
                quotes.push(OptionQuote::new("XYZ", OptionType::Call, strike, expiry, 1.0, 1.1));
                quotes.push(OptionQuote::new("XYZ", OptionType::Put, strike, expiry, 1.0, 1.1));
            }
        }
        let c = OptionChain::new("XYZ", 100.0, quotes.clone());
        let request = StrategyRequest { target_expiry: Some(as_of().date_naive()), ..Default::default() };

        let trades = generate_strategies(&c, 100.0, &request, as_of(), &ScanConfig::default()).unwrap();
        assert!(!trades.is_empty(), "The live expiry must be used");
        assert!(trades.iter().all(|t| t.expiration_date == Some(live)));

        let stale: Vec<OptionQuote> = quotes.into_iter().filter(|q| q.expiry == past).collect();
        let expired = OptionChain::new("XYZ", 100.0, stale);
        let err = generate_strategies(&expired, 100.0, &request, as_of(), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, OptionsError::EmptyChain { .. }));
    }

    #[test]
    fn test_empty_chain_is_an_error() {
        let empty = OptionChain::new("XYZ", 100.0, Vec::new());
        let err = generate_strategies(&empty, 100.0, &StrategyRequest::default(), as_of(), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, OptionsError::EmptyChain { .. }));
    }

    #[test]
    fn test_expiry_label_rounds_up() {
        let expiry = NaiveDate::from_ymd_opt(2026, 11, 17).unwrap();
        let as_of = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        assert_eq!(expiry_label(expiry, as_of), "Nov 17 (30d)");
        let later = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 1).unwrap();
        assert_eq!(expiry_label(expiry, later), "Nov 17 (30d)");
    }
}
