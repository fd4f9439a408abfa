//! Runner configuration loaded from TOML.
//!
//! Every table is optional; a missing table or key keeps the engine default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use strikelab_options::analysis::ScanConfig;
use strikelab_options::matrix::MatrixConfig;
use strikelab_options::pricing::PricingConfig;
use strikelab_options::synthetic::SyntheticConfig;
use tracing::{debug, info};

/// Default location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/default.toml";

/// Root configuration schema for the runner.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub pricing: PricingConfig,
    pub scan: ScanConfig,
    pub matrix: MatrixConfig,
    pub synthetic: SyntheticConfig,
}

impl RunnerConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse runner config")
    }

    /// Loads `path` if given (it must exist), otherwise the default file
    /// from the working directory or the workspace root, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            return Self::from_toml(&source);
        }

        let candidates = [PathBuf::from(DEFAULT_CONFIG_PATH), Path::new("../..").join(DEFAULT_CONFIG_PATH)];
        for candidate in &candidates {
            if let Ok(source) = fs::read_to_string(candidate) {
                info!("Loaded config from {}", candidate.display());
                return Self::from_toml(&source)
                    .with_context(|| format!("Invalid config file {}", candidate.display()));
            }
        }

        debug!("No config file found, using built-in defaults");
        Ok(Self::default())
    }
}
