use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tis_core::errors::ErrorInfo;
use tis_core::TisError;

/// YAML-configurable bounds for a set of interface volumes.
///
/// `min_values[i]` and `max_values[i]` bound interface `i`. Supplying any
/// period bound builds periodic interfaces; values wrap only when both are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InterfaceSetConfig {
    /// Lower bound of every interface.
    #[serde(default)]
    pub min_values: Vec<f64>,
    /// Upper bound of every interface.
    #[serde(default)]
    pub max_values: Vec<f64>,
    /// Lower edge of the periodic domain.
    #[serde(default)]
    pub period_min: Option<f64>,
    /// Upper edge of the periodic domain.
    #[serde(default)]
    pub period_max: Option<f64>,
}

impl InterfaceSetConfig {
    /// Whether this set describes periodic interfaces.
    pub fn is_periodic(&self) -> bool {
        self.period_min.is_some() || self.period_max.is_some()
    }

    /// Parses the configuration from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TisError> {
        serde_yaml::from_str(yaml)
            .map_err(|err| TisError::Config(ErrorInfo::new("config-parse", err.to_string())))
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, TisError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            TisError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| match err {
            TisError::Config(info) => {
                TisError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }
}
