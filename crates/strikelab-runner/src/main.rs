//! # StrikeLab Runner
//!
//! Command-line entry point for the StrikeLab options engine.
//!
//! ## Description
//! Wires a chain source (JSON snapshot or synthetic generator) and the
//! TOML configuration into the engine's request types:
//! - **strategies**: catalogue of multi-leg strategies for one expiration.
//! - **metrics**: evaluate a trade draft read from JSON.
//! - **matrix**: time × price profit grid for a trade draft.
//! - **price** / **iv**: single-option valuation and implied volatility.
//! - **ideas**: risk-profile trade ideas across expiries.
//!
//! Results go to stdout as JSON (or a text report with `--report`); logs go
//! to stderr.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

mod config;
mod report;
mod source;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use config::RunnerConfig;
use serde::Serialize;
use source::{read_json, ChainSource};
use std::path::PathBuf;
use strikelab_options::models::{OptionType, TradeDraft};
use strikelab_options::pricing::DAYS_PER_YEAR;
use strikelab_options::{
    black_scholes, calculate_profit_matrix, evaluate, find_trade_ideas, generate_strategies, implied_volatility,
    StrategyRequest,
};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// StrikeLab options strategy analyzer
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Override default config file path (default: configs/default.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// Print a text report instead of JSON
    #[arg(long, global = true, default_value = "false")]
    report: bool,

    /// Valuation instant, RFC 3339 (default: now)
    #[arg(long, global = true)]
    as_of: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

/// Where to take the option chain from.
#[derive(ClapArgs, Debug)]
struct ChainArgs {
    /// Chain snapshot JSON: { underlying, spot_price, quotes }
    #[arg(long)]
    chain: Option<PathBuf>,

    /// Ticker for a synthetic chain
    #[arg(long, default_value = "SPY")]
    underlying: String,

    /// Spot price for a synthetic chain
    #[arg(long)]
    spot: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build every feasible strategy for one expiration
    Strategies {
        #[command(flatten)]
        chain: ChainArgs,
        /// Current underlying price (default: chain spot)
        #[arg(long)]
        price: Option<f64>,
        /// Strike for single-leg strategies (default: current price)
        #[arg(long)]
        target_strike: Option<f64>,
        /// Target expiration, YYYY-MM-DD (default: earliest live expiry)
        #[arg(long)]
        expiry: Option<NaiveDate>,
        /// Sentiment filter, e.g. bullish, very_bearish, neutral
        #[arg(long)]
        sentiment: Option<String>,
    },
    /// Evaluate a trade draft read from JSON
    Metrics {
        /// Trade draft JSON: { name, sentiment, legs }
        #[arg(long)]
        trade: PathBuf,
        /// Current underlying price
        #[arg(long)]
        price: f64,
    },
    /// Profit matrix for a trade draft read from JSON
    Matrix {
        #[arg(long)]
        trade: PathBuf,
        #[arg(long)]
        price: f64,
        /// Ambient volatility for legs without IV and for z-scores
        #[arg(long, default_value = "0.3")]
        volatility: f64,
    },
    /// Black-Scholes value and Greeks of one option
    Price {
        #[arg(long, value_enum)]
        kind: Right,
        #[arg(long)]
        spot: f64,
        #[arg(long)]
        strike: f64,
        /// Calendar days to expiry
        #[arg(long)]
        days: f64,
        #[arg(long)]
        volatility: f64,
    },
    /// Implied volatility of an observed premium
    Iv {
        #[arg(long, value_enum)]
        kind: Right,
        /// Observed premium per share
        #[arg(long)]
        premium: f64,
        #[arg(long)]
        spot: f64,
        #[arg(long)]
        strike: f64,
        #[arg(long)]
        days: f64,
    },
    /// Low / Medium / Degen trade ideas across expiries
    Ideas {
        #[command(flatten)]
        chain: ChainArgs,
        #[arg(long)]
        price: Option<f64>,
        /// Price the underlying is expected to reach
        #[arg(long)]
        target_price: f64,
        /// Date by which the target is expected, YYYY-MM-DD
        #[arg(long)]
        target_date: NaiveDate,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Right {
    Call,
    Put,
}

impl From<Right> for OptionType {
    fn from(right: Right) -> Self {
        match right {
            Right::Call => OptionType::Call,
            Right::Put => OptionType::Put,
        }
    }
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize result")?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = RunnerConfig::load(args.config.as_deref())?;
    let as_of = args.as_of.unwrap_or_else(Utc::now);
    let today = as_of.date_naive();

    match args.command {
        Command::Strategies { chain, price, target_strike, expiry, sentiment } => {
            let source = ChainSource::resolve(chain.chain.as_deref(), &chain.underlying, chain.spot)?;
            let chain = source.load(as_of, &config.synthetic, &config.pricing)?;
            let current_price = price.unwrap_or(chain.spot_price);
            let request = StrategyRequest { target_strike, target_expiry: expiry, sentiment };
            let trades = generate_strategies(&chain, current_price, &request, as_of, &config.scan)?;

            if args.report {
                print!("{}", report::strategies_report(&chain.underlying, &trades));
                Ok(())
            } else {
                emit(&trades)
            }
        }
        Command::Metrics { trade, price } => {
            let draft: TradeDraft = read_json(&trade)?;
            let trade = evaluate(draft, price, today, &config.scan)?;
            if args.report {
                print!("{}", report::trade_summary(&trade));
                Ok(())
            } else {
                emit(&trade)
            }
        }
        Command::Matrix { trade, price, volatility } => {
            let draft: TradeDraft = read_json(&trade)?;
            let trade = evaluate(draft, price, today, &config.scan)?;
            let grid = calculate_profit_matrix(&trade, price, volatility, as_of, &config.matrix);
            info!("{} matrix: {} cells", trade.name, grid.len());
            if args.report {
                print!("{}", report::matrix_table(&grid));
                Ok(())
            } else {
                emit(&grid)
            }
        }
        Command::Price { kind, spot, strike, days, volatility } => {
            let valuation = black_scholes(
                kind.into(), spot, strike, days / DAYS_PER_YEAR, config.pricing.risk_free_rate, volatility,
            )?;
            emit(&valuation)
        }
        Command::Iv { kind, premium, spot, strike, days } => {
            let time = (days / DAYS_PER_YEAR).max(config.pricing.time_floor_years);
            let solution = implied_volatility(premium, kind.into(), spot, strike, time, config.pricing.risk_free_rate)?;
            if !solution.converged {
                warn!("IV did not converge after {} iterations", solution.iterations);
            }
            emit(&solution)
        }
        Command::Ideas { chain, price, target_price, target_date } => {
            let source = ChainSource::resolve(chain.chain.as_deref(), &chain.underlying, chain.spot)?;
            let chain = source
                .load(as_of, &config.synthetic, &config.pricing)?
                .with_model_greeks(as_of, &config.pricing);
            let current_price = price.unwrap_or(chain.spot_price);
            let ideas = find_trade_ideas(
                &chain, current_price, target_price, target_date, as_of, &config.pricing, &config.scan,
            );
            if args.report {
                print!("{}", report::ideas_report(&ideas));
                Ok(())
            } else {
                emit(&ideas)
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategies_command() {
        let args = Args::try_parse_from([
            "strikelab", "strategies", "--spot", "100", "--expiry", "2026-11-20", "--sentiment", "bullish",
        ])
        .unwrap();
        match args.command {
            Command::Strategies { chain, expiry, sentiment, price, .. } => {
                assert_eq!(chain.spot, Some(100.0));
                assert_eq!(chain.underlying, "SPY");
                assert_eq!(expiry, NaiveDate::from_ymd_opt(2026, 11, 20));
                assert_eq!(sentiment.as_deref(), Some("bullish"));
                assert_eq!(price, None);
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "strikelab", "price", "--kind", "put", "--spot", "100", "--strike", "95", "--days", "30",
            "--volatility", "0.25", "--verbose", "--as-of", "2026-10-18T14:30:00Z",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.as_of.map(|t| t.to_rfc3339()), Some("2026-10-18T14:30:00+00:00".to_string()));
        assert!(matches!(args.command, Command::Price { kind: Right::Put, .. }));
    }

    #[test]
    fn test_matrix_volatility_default() {
        let args = Args::try_parse_from(["strikelab", "matrix", "--trade", "t.json", "--price", "100"]).unwrap();
        match args.command {
            Command::Matrix { volatility, .. } => assert_eq!(volatility, 0.3),
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_ideas_requires_target() {
        assert!(Args::try_parse_from(["strikelab", "ideas", "--spot", "100"]).is_err());
    }

    #[test]
    fn test_right_maps_to_option_type() {
        assert_eq!(OptionType::from(Right::Call), OptionType::Call);
        assert_eq!(OptionType::from(Right::Put), OptionType::Put);
    }
}
