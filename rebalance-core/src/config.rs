//! Serializable configuration.
//!
//! Strategy parameters are fixed per strategy instance. Selection methods are
//! kept as raw strings here and resolved into `SelectionMode`s when the
//! strategy is built, so an unsupported method fails before any period runs.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Invalid strategy configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unsupported buy method '{0}' (expected 'top' or 'random')")]
    UnsupportedBuyMethod(String),
    #[error("unsupported sell method '{0}' (expected 'bottom' or 'random')")]
    UnsupportedSellMethod(String),
    #[error("topk must be greater than zero")]
    ZeroTopk,
    #[error("risk_degree must be in (0, 1], got {0}")]
    RiskDegreeOutOfRange(f64),
    #[error("hold_thresh must be at least 1")]
    ZeroHoldThresh,
}

/// Failure to read or parse a configuration file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_method_buy() -> String {
    "top".into()
}

fn default_method_sell() -> String {
    "bottom".into()
}

fn default_risk_degree() -> f64 {
    0.95
}

fn default_hold_thresh() -> u32 {
    1
}

/// Top-k/drop-n parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopkDropoutConfig {
    /// Target number of held instruments.
    pub topk: usize,
    /// Maximum replacements per period.
    pub n_drop: usize,
    #[serde(default = "default_method_buy")]
    pub method_buy: String,
    #[serde(default = "default_method_sell")]
    pub method_sell: String,
    /// Fraction of available cash deployed into buys.
    #[serde(default = "default_risk_degree")]
    pub risk_degree: f64,
    /// Minimum periods held before a sale is allowed.
    #[serde(default = "default_hold_thresh")]
    pub hold_thresh: u32,
    /// Exclude non-tradable instruments from selection.
    #[serde(default)]
    pub only_tradable: bool,
}

impl TopkDropoutConfig {
    pub fn new(topk: usize, n_drop: usize) -> Self {
        Self {
            topk,
            n_drop,
            method_buy: default_method_buy(),
            method_sell: default_method_sell(),
            risk_degree: default_risk_degree(),
            hold_thresh: default_hold_thresh(),
            only_tradable: false,
        }
    }

    /// Check the numeric parameters. Method strings are checked when they
    /// are resolved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topk == 0 {
            return Err(ConfigError::ZeroTopk);
        }
        if !(self.risk_degree > 0.0 && self.risk_degree <= 1.0) {
            return Err(ConfigError::RiskDegreeOutOfRange(self.risk_degree));
        }
        if self.hold_thresh == 0 {
            return Err(ConfigError::ZeroHoldThresh);
        }
        Ok(())
    }
}

/// Simulated venue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Lot size in unadjusted units; `None` allows fractional amounts.
    #[serde(default)]
    pub trade_unit: Option<f64>,
    #[serde(default)]
    pub open_cost: f64,
    #[serde(default)]
    pub close_cost: f64,
    #[serde(default)]
    pub min_cost: f64,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self { trade_unit: None, open_cost: 0.0, close_cost: 0.0, min_cost: 0.0 }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_initial_cash() -> f64 {
    1_000_000.0
}

fn default_step() -> usize {
    1
}

/// Backtest driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSettings {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
    /// Trading dates per period.
    #[serde(default = "default_step")]
    pub step: usize,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self { seed: default_seed(), initial_cash: default_initial_cash(), step: default_step() }
    }
}

/// Top-level configuration file.
///
/// ```toml
/// [strategy]
/// topk = 50
/// n_drop = 5
/// method_buy = "top"
/// method_sell = "bottom"
///
/// [venue]
/// trade_unit = 100
/// close_cost = 0.0015
///
/// [backtest]
/// seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceConfig {
    pub strategy: TopkDropoutConfig,
    #[serde(default)]
    pub venue: VenueConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
}

impl RebalanceConfig {
    pub fn from_toml(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }
}
