//! # Strategist Module
//!
//! Risk-profile trade ideas drawn from a multi-expiry chain.
//!
//! ## Description
//! Three ideas, one per [`RiskProfile`]:
//! - **Low (The Landlord)**: poor man's covered call. Long the call nearest
//!   0.85 delta about 180 days out, short the call nearest 0.30 delta about
//!   30 days out.
//! - **Medium (The Strategist)**: the same diagonal at 0.70 delta / ~90 days
//!   against 0.40 delta / ~14 days.
//! - **Degen (The Moonshot)**: the single call, expiring a week after the
//!   target date, with the best theoretical return if the underlying reaches
//!   the target price by then.
//!
//! Expiries are matched with [`OptionChain::nearest_to_expiry`]; strikes by
//! delta with [`OptionChain::closest_delta`], so the chain must carry Greeks
//! (see [`OptionChain::with_model_greeks`]). An idea whose legs cannot be
//! found is omitted.

use crate::analysis::{evaluate, ScanConfig};
use crate::chain::OptionChain;
use crate::pricing::{black_scholes, year_fraction, PricingConfig, DAYS_PER_YEAR};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use strikelab_models::{
    expiry_instant, Action, OptionQuote, OptionType, RiskProfile, Sentiment, TradeDraft, TradeIdea, TradeLeg,
};
use tracing::{info, warn};

/// Diagonal call spread recipe for the income profiles.
struct DiagonalPlan {
    profile: RiskProfile,
    long_days: i64,
    long_delta: f64,
    short_days: i64,
    short_delta: f64,
    description: &'static str,
    roi: &'static str,
}

const DIAGONALS: [DiagonalPlan; 2] = [
    DiagonalPlan {
        profile: RiskProfile::Low,
        long_days: 180,
        long_delta: 0.85,
        short_days: 30,
        short_delta: 0.30,
        description: "Poor Man's Covered Call (PMCC). Buy deep ITM LEAPS and sell monthly calls against it for income.",
        roi: "~15-25% annualized",
    },
    DiagonalPlan {
        profile: RiskProfile::Medium,
        long_days: 90,
        long_delta: 0.70,
        short_days: 14,
        short_delta: 0.40,
        description: "Aggressive PMCC. Higher delta short call for more premium, but capped upside.",
        roi: "~30-50% annualized",
    },
];

/// Days between the target date and the moonshot call's expiry.
const MOONSHOT_EXPIRY_BUFFER_DAYS: i64 = 7;

fn call_near_delta(chain: &OptionChain, target: NaiveDate, delta: f64) -> Option<OptionQuote> {
    chain
        .nearest_to_expiry(target)
        .closest_delta(OptionType::Call, delta)
        .cloned()
}

fn diagonal_draft(chain: &OptionChain, plan: &DiagonalPlan, today: NaiveDate) -> Option<TradeDraft> {
    let long = call_near_delta(chain, today + Duration::days(plan.long_days), plan.long_delta)?;
    let short = call_near_delta(chain, today + Duration::days(plan.short_days), plan.short_delta)?;
    let description = format!(
        "Buy Call {:.2} ({}), Sell Call {:.2} ({})",
        long.strike, long.expiry, short.strike, short.expiry
    );
    let legs = vec![TradeLeg::option(Action::Buy, 1, long), TradeLeg::option(Action::Sell, 1, short)];
    Some(TradeDraft::new("Poor Man's Covered Call", Sentiment::Bullish, legs).with_description(description))
}

/// Call with the highest `(BS(target) − ask) / ask` a week after the target date.
fn moonshot(
    chain: &OptionChain,
    target_price: f64,
    target_date: NaiveDate,
    as_of: DateTime<Utc>,
    pricing: &PricingConfig,
) -> Option<(OptionQuote, f64)> {
    let days_to_target = (year_fraction(as_of, expiry_instant(target_date)) * DAYS_PER_YEAR).max(1.0);
    let days_out = days_to_target.floor() as i64 + MOONSHOT_EXPIRY_BUFFER_DAYS;
    let candidates = chain.nearest_to_expiry(as_of.date_naive() + Duration::days(days_out));
    let remaining = MOONSHOT_EXPIRY_BUFFER_DAYS as f64 / DAYS_PER_YEAR;

    let mut best: Option<(OptionQuote, f64)> = None;
    for quote in candidates.quotes().iter().filter(|q| q.option_type == OptionType::Call) {
        if quote.ask <= 0.0 {
            continue;
        }
        let Ok(theo) = black_scholes(
            OptionType::Call, target_price, quote.strike, remaining, pricing.risk_free_rate, quote.implied_vol,
        ) else {
            continue;
        };
        let roi = (theo.price - quote.ask) / quote.ask;
        if best.as_ref().map_or(true, |(_, r)| roi > *r) {
            best = Some((quote.clone(), roi));
        }
    }
    best
}

/// Builds the Low, Medium and Degen ideas that the chain can support.
///
/// # Parameters
/// * `chain` - Multi-expiry chain with Greeks populated
/// * `current_price` - Underlying price now
/// * `target_price` - Price the Degen idea bets on
/// * `target_date` - Date by which the target should be reached
/// * `as_of` - Valuation instant
///
/// # Returns
/// Evaluated ideas in Low, Medium, Degen order; missing ones are skipped.
pub fn find_trade_ideas(
    chain: &OptionChain,
    current_price: f64,
    target_price: f64,
    target_date: NaiveDate,
    as_of: DateTime<Utc>,
    pricing: &PricingConfig,
    scan: &ScanConfig,
) -> Vec<TradeIdea> {
    let today = as_of.date_naive();
    let mut ideas = Vec::new();

    for plan in &DIAGONALS {
        let Some(draft) = diagonal_draft(chain, plan, today) else {
            continue;
        };
        match evaluate(draft, current_price, today, scan) {
            Ok(trade) => ideas.push(TradeIdea {
                risk_profile: plan.profile,
                description: plan.description.to_string(),
                trade,
                roi: plan.roi.to_string(),
            }),
            Err(e) => warn!("Skipping {} idea: {}", plan.profile, e),
        }
    }

    if let Some((call, roi)) = moonshot(chain, target_price, target_date, as_of, pricing) {
        let description = format!("Buy 1 Call at Strike {:.2} ({})", call.strike, call.expiry);
        let draft = TradeDraft::new("Long Call", Sentiment::Bullish, vec![TradeLeg::option(Action::Buy, 1, call)])
            .with_description(description);
        match evaluate(draft, current_price, today, scan) {
            Ok(trade) => ideas.push(TradeIdea {
                risk_profile: RiskProfile::Degen,
                description: "Naked Call. Highest theoretical ROI if target hit.".to_string(),
                trade,
                roi: format!("{:.0}%", roi * 100.0),
            }),
            Err(e) => warn!("Skipping {} idea: {}", RiskProfile::Degen, e),
        }
    }

    info!("Found {} trade ideas for {} (target {:.2} by {})", ideas.len(), chain.underlying, target_price, target_date);
    ideas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{synthetic_chain, SyntheticConfig};
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap()
    }

    fn chain() -> OptionChain {
        synthetic_chain("XYZ", 100.0, as_of(), &SyntheticConfig::default(), &PricingConfig::default()).unwrap()
    }

    fn ideas(target_price: f64, target_date: NaiveDate) -> Vec<TradeIdea> {
        find_trade_ideas(&chain(), 100.0, target_price, target_date, as_of(), &PricingConfig::default(), &ScanConfig::default())
    }

    #[test]
    fn test_three_profiles_in_order() {
        let found = ideas(120.0, NaiveDate::from_ymd_opt(2026, 11, 10).unwrap());
        let profiles: Vec<RiskProfile> = found.iter().map(|i| i.risk_profile).collect();
        assert_eq!(profiles, vec![RiskProfile::Low, RiskProfile::Medium, RiskProfile::Degen]);
    }

    #[test]
    fn test_landlord_legs() {
        let found = ideas(120.0, NaiveDate::from_ymd_opt(2026, 11, 10).unwrap());
        let low = &found[0];
        let legs = low.trade.legs();
        assert_eq!(legs.len(), 2);

        let long = legs[0].quote().unwrap();
        let short = legs[1].quote().unwrap();
        assert_eq!(legs[0].action, Action::Buy);
        assert_eq!(long.expiry, NaiveDate::from_ymd_opt(2027, 4, 16).unwrap());
        assert_eq!(short.expiry, NaiveDate::from_ymd_opt(2026, 11, 17).unwrap());
        assert!((long.delta - 0.85).abs() < 0.1, "Long delta {}", long.delta);
        assert!((short.delta - 0.30).abs() < 0.15, "Short delta {}", short.delta);
        assert!(low.trade.net_debit() > 0.0, "Diagonal is a debit");
        assert_eq!(low.roi, "~15-25% annualized");
    }

    #[test]
    fn test_moonshot_expires_after_target() {
        let found = ideas(120.0, NaiveDate::from_ymd_opt(2026, 11, 10).unwrap());
        let degen = &found[2];
        let leg = degen.trade.legs()[0].quote().unwrap();
        assert_eq!(leg.option_type, OptionType::Call);
        // 22.4 days to target + 7 → nearest listed expiry is the 30-day one.
        assert_eq!(leg.expiry, NaiveDate::from_ymd_opt(2026, 11, 17).unwrap());
        assert!(degen.roi.ends_with('%'));
        assert!(degen.trade.metrics().profit_unbounded);
    }

    #[test]
    fn test_empty_chain_yields_no_ideas() {
        let empty = OptionChain::new("XYZ", 100.0, Vec::new());
        let found = find_trade_ideas(
            &empty, 100.0, 120.0, NaiveDate::from_ymd_opt(2026, 11, 10).unwrap(), as_of(),
            &PricingConfig::default(), &ScanConfig::default(),
        );
        assert!(found.is_empty());
    }
}
