//! Chain and trade inputs: JSON snapshots on disk or a synthetic chain.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use strikelab_options::chain::OptionChain;
use strikelab_options::pricing::PricingConfig;
use strikelab_options::synthetic::{synthetic_chain, SyntheticConfig};
use tracing::info;

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Where the option chain comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainSource<'a> {
    /// A `{ underlying, spot_price, quotes }` snapshot file.
    File(&'a Path),
    /// Generated around `spot` with the `[synthetic]` settings.
    Synthetic { underlying: &'a str, spot: f64 },
}

impl<'a> ChainSource<'a> {
    /// Picks the file when one is given, otherwise requires a spot price.
    pub fn resolve(file: Option<&'a Path>, underlying: &'a str, spot: Option<f64>) -> Result<Self> {
        match (file, spot) {
            (Some(path), _) => Ok(ChainSource::File(path)),
            (None, Some(spot)) => Ok(ChainSource::Synthetic { underlying, spot }),
            (None, None) => bail!("Either --chain <file> or --spot <price> is required"),
        }
    }

    pub fn load(
        &self,
        as_of: DateTime<Utc>,
        synthetic: &SyntheticConfig,
        pricing: &PricingConfig,
    ) -> Result<OptionChain> {
        let chain = match self {
            ChainSource::File(path) => read_json::<OptionChain>(path)?,
            ChainSource::Synthetic { underlying, spot } => synthetic_chain(underlying, *spot, as_of, synthetic, pricing)
                .with_context(|| format!("Could not generate a synthetic chain for {}", underlying))?,
        };
        info!(
            "Chain {} @ {:.2}: {} quotes across {} expiries",
            chain.underlying,
            chain.spot_price,
            chain.len(),
            chain.expiries().len()
        );
        Ok(chain)
    }
}
