// src/error.rs

use std::time::Duration;
use thiserror::Error;

/// Failures raised while running a ranking cycle.
///
/// Source-level variants are always tagged with the source name so the
/// aggregator can report them without knowing which venue produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("{source_name}: source unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("{source_name}: unexpected payload: {reason}")]
    SourceParse { source_name: String, reason: String },

    #[error("{source_name}: no response within {after:?}")]
    SourceTimeout { source_name: String, after: Duration },

    #[error("no data: all {attempted} sources failed")]
    NoData { attempted: usize },

    #[error("notification failed: {0}")]
    Notify(String),
}

impl FlowError {
    pub fn unavailable(source_name: &str, reason: impl ToString) -> Self {
        FlowError::SourceUnavailable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(source_name: &str, reason: impl ToString) -> Self {
        FlowError::SourceParse {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The source a failure is attributed to, if it is a source-level failure.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            FlowError::SourceUnavailable { source_name, .. }
            | FlowError::SourceParse { source_name, .. }
            | FlowError::SourceTimeout { source_name, .. } => Some(source_name),
            FlowError::NoData { .. } | FlowError::Notify(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;

/// Startup configuration problems. These are the only fatal errors.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(String),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}
