use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, CompareResult};

/// Percent-change tolerances for the three headline metrics.
///
/// A metric fails when the absolute value of its percent change is strictly
/// greater than its threshold. Zero and negative values are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Tolerance for the total record count.
    pub entity_percent: f64,
    /// Tolerance for the total attribute value count.
    pub attribute_percent: f64,
    /// Tolerance for the average values per record.
    pub avg_attributes_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            entity_percent: 10.0,
            attribute_percent: 10.0,
            avg_attributes_percent: 15.0,
        }
    }
}

/// What to do with a record the parser rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Fail the whole file on the first malformed record.
    #[default]
    Abort,
    /// Log the malformed record and continue with the next one.
    Skip,
}

/// Configuration for a comparison run.
///
/// Every field is optional in TOML:
///
/// ```toml
/// parse_policy = "skip"
///
/// [thresholds]
/// entity_percent = 5.0
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub thresholds: Thresholds,
    pub parse_policy: ParsePolicy,
}

impl CompareConfig {
    /// Decode a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> CompareResult<Self> {
        toml::from_str(text).map_err(|e| CompareError::Config(e.to_string()))
    }

    /// Read and decode a TOML configuration file.
    pub fn load(path: &Path) -> CompareResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| CompareError::io(path, e))?;
        Self::from_toml_str(&text)
    }
}
