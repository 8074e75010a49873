//! Simulator configuration: TOML parsing, validation, and path resolution.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock dashboard: ETH at 1650 on the 60-bar live view, ticking every 400ms.
//!
//! ```toml
//! symbol = "ETH-USD"
//! start_price = 1650.0
//! timeframe = "1D"
//! seed = 7
//!
//! [generator]
//! bias = 0.48
//! volatility = 25.0
//!
//! [updater]
//! tick_ms = 400
//! ```
//!
//! Entrypoints:
//! - [`load_config_str`] parses and validates a TOML string.
//! - [`load_config_path`] does the same for a file.
//! - [`resolve_config`] picks an explicit path, then `MARKET_SIM_CONFIG`,
//!   then the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared_utils::env::{get_optional_env_var, parse_env_var};
use tracing::debug;

use crate::{
    errors::{Error, Result},
    generator::GeneratorConfig,
    models::timeframe::Timeframe,
    projection::ChartPalette,
    updater::UpdaterConfig,
};

/// Environment variable naming a config file when no path is given.
pub const CONFIG_ENV_VAR: &str = "MARKET_SIM_CONFIG";
/// Environment variable overriding the configured seed.
pub const SEED_ENV_VAR: &str = "MARKET_SIM_SEED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub symbol: String,
    pub start_price: f64,
    /// Timeframe shown when the session opens.
    pub timeframe: Timeframe,
    /// Fixed seed for reproducible runs; OS-seeded when absent.
    pub seed: Option<u64>,
    pub generator: GeneratorConfig,
    pub updater: UpdaterConfig,
    pub palette: ChartPalette,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            symbol: "ETH-USD".to_string(),
            start_price: 1650.0,
            timeframe: Timeframe::Live,
            seed: None,
            generator: GeneratorConfig::default(),
            updater: UpdaterConfig::default(),
            palette: ChartPalette::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::Config("symbol must not be empty".into()));
        }
        if !self.start_price.is_finite() || self.start_price <= 0.0 {
            return Err(Error::Config(format!(
                "start_price must be positive, got {}",
                self.start_price
            )));
        }
        self.generator.validate().map_err(into_config_error)?;
        self.updater.validate().map_err(into_config_error)?;
        Ok(())
    }
}

fn into_config_error(err: Error) -> Error {
    match err {
        Error::InvalidArgument(msg) => Error::Config(msg),
        other => other,
    }
}

/// Parse and validate a TOML string.
pub fn load_config_str(s: &str) -> Result<SimConfig> {
    let config: SimConfig = toml::from_str(s)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a TOML file.
pub fn load_config_path(path: impl AsRef<Path>) -> Result<SimConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config = load_config_str(&text)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Resolves the effective configuration.
///
/// Uses `explicit` if given, else the file named by [`CONFIG_ENV_VAR`], else
/// [`SimConfig::default`]. A seed in [`SEED_ENV_VAR`] overrides the file.
pub fn resolve_config(explicit: Option<&Path>) -> Result<SimConfig> {
    let path: Option<PathBuf> = explicit
        .map(Path::to_path_buf)
        .or_else(|| get_optional_env_var(CONFIG_ENV_VAR).map(PathBuf::from));

    let mut config = match path {
        Some(p) => load_config_path(p)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_env_var::<u64>(SEED_ENV_VAR)? {
        config.seed = Some(seed);
    }
    Ok(config)
}
