//! `tracing` subscriber setup shared by binaries and tests that drive TIS crates.

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter, Registry};

use crate::errors::{ErrorInfo, TisError};

/// Describes how the process-wide subscriber should be installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Explicit filter directives (e.g. `tis_sample=debug,info`). When absent
    /// `RUST_LOG` is consulted, then [`TracingConfig::default_directive`].
    #[serde(default)]
    pub directives: Option<String>,
    /// Directive used when nothing else resolves.
    #[serde(default = "default_directive")]
    pub default_directive: String,
    /// Whether event targets (module paths) appear in output.
    #[serde(default = "default_true")]
    pub include_targets: bool,
    /// Whether ANSI colour codes are emitted.
    #[serde(default = "default_true")]
    pub ansi: bool,
}

fn default_directive() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            directives: None,
            default_directive: default_directive(),
            include_targets: true,
            ansi: true,
        }
    }
}

impl TracingConfig {
    /// Resolves the filter: explicit directives, then `RUST_LOG`, then the default.
    pub fn resolve_filter(&self) -> Result<EnvFilter, TisError> {
        if let Some(directives) = &self.directives {
            EnvFilter::try_new(directives).map_err(|err| {
                TisError::Config(
                    ErrorInfo::new("invalid-filter", err.to_string())
                        .with_context("directives", directives.clone()),
                )
            })
        } else {
            match EnvFilter::try_from_default_env() {
                Ok(filter) => Ok(filter),
                Err(_) => Ok(EnvFilter::new(self.default_directive.clone())),
            }
        }
    }
}

/// Installs the configured fmt subscriber as the global default.
///
/// Fails with a `subscriber-init` config error when a global subscriber is
/// already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TisError> {
    let filter = config.resolve_filter()?;
    let directives = filter.to_string();
    let layer = tracing_fmt::layer()
        .with_target(config.include_targets)
        .with_ansi(config.ansi);
    Registry::default()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|err| TisError::Config(ErrorInfo::new("subscriber-init", err.to_string())))?;
    tracing::debug!(%directives, "installed tracing subscriber");
    Ok(())
}
