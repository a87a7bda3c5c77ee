use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tis_core::errors::ErrorInfo;
use tis_core::{RngHandle, TisError};
use tracing::debug;

use crate::sampleset::{EnsembleKey, IntoSamples, SampleSet};

/// YAML-configurable behaviour of a sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSetConfig {
    /// Master seed and substream policy for random picks.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Run the consistency check after every mutation.
    #[serde(default = "default_verify")]
    pub verify_after_mutation: bool,
}

fn default_verify() -> bool {
    true
}

impl Default for SampleSetConfig {
    fn default() -> Self {
        Self {
            seed_policy: SeedPolicy::default(),
            verify_after_mutation: default_verify(),
        }
    }
}

impl SampleSetConfig {
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

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed of the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label naming the run in logs.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

impl SeedPolicy {
    /// Handle for `substream` of the master seed.
    ///
    /// Distinct substreams give independent, reproducible draws.
    pub fn rng(&self, substream: u64) -> RngHandle {
        debug!(
            master_seed = self.master_seed,
            substream,
            label = self.label.as_deref().unwrap_or(""),
            "derived rng substream"
        );
        RngHandle::substream(self.master_seed, substream)
    }
}

impl<E: EnsembleKey, T: Clone + PartialEq> SampleSet<E, T> {
    /// Builds a set from `samples` with the behaviour described by `config`.
    ///
    /// The initial indexes are checked when verification is enabled.
    pub fn with_config(
        samples: impl IntoSamples<E, T>,
        config: &SampleSetConfig,
    ) -> Result<Self, TisError> {
        let set = Self::new(samples).verify_after_mutation(config.verify_after_mutation);
        if config.verify_after_mutation {
            set.consistency_check()?;
        }
        Ok(set)
    }
}
