//! Report configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides:
//!
//! ```toml
//! reference_currency = "USD"
//! top_n = 10
//!
//! [columns]
//! fraud_flag = "is_fraud"
//!
//! [rates]
//! date = "date"
//! ```

use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level settings for a report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    /// Currency every amount is normalized to
    pub reference_currency: String,
    /// Number of groups shown in top-N sections
    pub top_n: usize,
    /// Number of rows shown in the overview
    pub head_rows: usize,
    pub columns: TransactionColumns,
    pub rates: RateColumns,
}

/// Column names of the transaction file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionColumns {
    pub timestamp: String,
    pub amount: String,
    pub currency: String,
    pub fraud_flag: String,
    pub city: String,
    pub vendor_category: String,
    pub vendor_type: String,
}

/// Column names of the exchange-rate file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateColumns {
    pub date: String,
    /// Currency code column (long layout only)
    pub currency: String,
    /// Rate value column (long layout only)
    pub rate: String,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            reference_currency: "USD".to_string(),
            top_n: 10,
            head_rows: 5,
            columns: TransactionColumns::default(),
            rates: RateColumns::default(),
        }
    }
}

impl Default for TransactionColumns {
    fn default() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            amount: "amount".to_string(),
            currency: "currency".to_string(),
            fraud_flag: "is_fraud".to_string(),
            city: "city".to_string(),
            vendor_category: "vendor_category".to_string(),
            vendor_type: "vendor_type".to_string(),
        }
    }
}

impl Default for RateColumns {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            currency: "currency".to_string(),
            rate: "rate".to_string(),
        }
    }
}

impl EdaConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// Without a path the defaults are used. A path that cannot be read or
    /// parsed is an error rather than a silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(EdaError::FileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        log::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reference_currency.trim().is_empty() {
            return Err(EdaError::Config(
                "reference_currency must not be empty".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(EdaError::Config("top_n must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Name of the derived column holding amounts in the reference currency
    pub fn converted_column(&self) -> String {
        format!("amount_{}", self.reference_currency.to_lowercase())
    }
}
