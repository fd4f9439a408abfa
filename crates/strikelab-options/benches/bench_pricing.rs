//! # Options Engine Benchmarks
//!
//! Measures the per-request cost of pricing, metrics scanning and the profit matrix.
//!
//! ## Description
//! Uses Criterion to profile the three hot paths of a request: a single
//! Black-Scholes valuation, an implied-volatility solve, the 1001-point
//! expiry scan of an iron condor and a full 8×21 profit matrix.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strikelab_options::analysis::{compute_metrics, ScanConfig};
use strikelab_options::matrix::{calculate_profit_matrix, MatrixConfig};
use strikelab_options::models::OptionType;
use strikelab_options::pricing::{black_scholes, implied_volatility, PricingConfig};
use strikelab_options::strategy::StrategyKind;
use strikelab_options::synthetic::{synthetic_chain, SyntheticConfig};
use strikelab_options::evaluate;

fn bench_black_scholes(c: &mut Criterion) {
    c.bench_function("black_scholes_call", |b| {
        b.iter(|| {
            let _ = black_box(black_scholes(
                OptionType::Call,
                black_box(100.0),
                black_box(105.0),
                black_box(30.0 / 365.0),
                0.05,
                0.30,
            ));
        });
    });
}

fn bench_implied_volatility(c: &mut Criterion) {
    let price = black_scholes(OptionType::Put, 100.0, 95.0, 0.5, 0.05, 0.35).map(|v| v.price).unwrap_or(0.0);
    c.bench_function("implied_volatility_put", |b| {
        b.iter(|| {
            let _ = black_box(implied_volatility(black_box(price), OptionType::Put, 100.0, 95.0, 0.5, 0.05));
        });
    });
}

fn bench_metrics_and_matrix(c: &mut Criterion) {
    let as_of = Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap();
    let config = SyntheticConfig { expiry_days: vec![30], ..Default::default() };
    let chain = synthetic_chain("XYZ", 100.0, as_of, &config, &PricingConfig::default()).unwrap();
    let draft = StrategyKind::IronCondor.build(&chain, 100.0, 100.0).unwrap();
    let scan = ScanConfig::default();

    c.bench_function("iron_condor_metrics_scan", |b| {
        b.iter(|| black_box(compute_metrics(black_box(&draft.legs), 100.0, &scan)));
    });

    let trade = evaluate(draft, 100.0, as_of.date_naive(), &scan).unwrap();
    let matrix = MatrixConfig::default();
    c.bench_function("iron_condor_profit_matrix", |b| {
        b.iter(|| black_box(calculate_profit_matrix(black_box(&trade), 100.0, 0.3, as_of, &matrix)));
    });
}

criterion_group!(benches, bench_black_scholes, bench_implied_volatility, bench_metrics_and_matrix);
criterion_main!(benches);
