//! Valuation case files and assumption overrides.
//!
//! A case file pairs an optional snapshot with (possibly partial) assumptions:
//!
//! ```yaml
//! snapshot:
//!   ticker: ACME
//!   revenue_ttm: 1200
//!   ebit: 180
//!   tax_rate: 21
//!   cash: 300
//!   debt: 150
//!   shares: 40
//!   price: 35
//! assumptions:
//!   stage1_growth: 15
//!   terminal_wacc: 8
//! ```
//!
//! Assumption fields left out fall back to [`ModelAssumptions::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FinancialSnapshot, ModelAssumptions};

/// Environment variable naming the directory read by the file snapshot source.
pub const DATA_DIR_ENV: &str = "FERRODCF_DATA_DIR";
/// Environment variable holding the default log filter.
pub const LOG_LEVEL_ENV: &str = "FERRODCF_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read case file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON case file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML case file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported case file extension for {path}, expected .json, .yaml or .yml")]
    UnsupportedFormat { path: PathBuf },
}

/// Serialization format of a case file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFormat {
    Json,
    Yaml,
}

impl CaseFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Inputs of one valuation run as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<FinancialSnapshot>,
    #[serde(default)]
    pub assumptions: ModelAssumptions,
}

impl ValuationCase {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = CaseFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, format, path)
    }

    pub fn parse(raw: &str, format: CaseFormat, origin: &Path) -> Result<Self, ConfigError> {
        match format {
            CaseFormat::Json => serde_json::from_str(raw).map_err(|source| ConfigError::Json {
                path: origin.to_path_buf(),
                source,
            }),
            CaseFormat::Yaml => serde_yaml::from_str(raw).map_err(|source| ConfigError::Yaml {
                path: origin.to_path_buf(),
                source,
            }),
        }
    }
}

/// Per-field assumption overrides, typically from command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssumptionOverrides {
    pub stage1_growth: Option<f64>,
    pub stage2_growth: Option<f64>,
    pub target_margin: Option<f64>,
    pub terminal_growth: Option<f64>,
    pub initial_wacc: Option<f64>,
    pub terminal_wacc: Option<f64>,
    pub sales_to_capital: Option<f64>,
}

impl AssumptionOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, base: ModelAssumptions) -> ModelAssumptions {
        ModelAssumptions {
            stage1_growth: self.stage1_growth.unwrap_or(base.stage1_growth),
            stage2_growth: self.stage2_growth.unwrap_or(base.stage2_growth),
            target_margin: self.target_margin.unwrap_or(base.target_margin),
            terminal_growth: self.terminal_growth.unwrap_or(base.terminal_growth),
            initial_wacc: self.initial_wacc.unwrap_or(base.initial_wacc),
            terminal_wacc: self.terminal_wacc.unwrap_or(base.terminal_wacc),
            sales_to_capital: self.sales_to_capital.unwrap_or(base.sales_to_capital),
        }
    }
}
