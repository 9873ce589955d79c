//! Error types
//!
//! The tick path never fails; these cover loading data and host commands.

use thiserror::Error;

/// Problems with level or tuning data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level catalog is empty")]
    EmptyCatalog,
    #[error("level {index} ({name}) is invalid: {reason}")]
    InvalidLevel {
        index: usize,
        name: String,
        reason: &'static str,
    },
}

/// Host command failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown level index {index} (catalog has {count} levels)")]
    UnknownLevel { index: usize, count: usize },
    #[error("no level has been started")]
    NotStarted,
}
