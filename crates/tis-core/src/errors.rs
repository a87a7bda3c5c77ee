//! Structured error types shared across TIS crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`TisError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (keys, bounds, lengths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for volumes and sample sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum TisError {
    /// An object could not be built from the supplied parameters.
    #[error("construction error: {0}")]
    Construction(ErrorInfo),
    /// A sample was assigned under a key it does not carry.
    #[error("key mismatch: {0}")]
    KeyMismatch(ErrorInfo),
    /// A lookup found no matching entry.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// Internal indexes disagree with the stored samples.
    #[error("consistency violation: {0}")]
    Consistency(ErrorInfo),
    /// Configuration and subscriber setup errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl TisError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            TisError::Construction(info)
            | TisError::KeyMismatch(info)
            | TisError::NotFound(info)
            | TisError::Consistency(info)
            | TisError::Config(info) => info,
        }
    }

    /// Returns the stable machine readable code of the error.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
