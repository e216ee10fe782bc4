//! User-facing configuration errors (CLI flags, profiles, runtime keys).

use thiserror::Error;

use crate::poller::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("interval must be between {MIN_INTERVAL_SECS} and {MAX_INTERVAL_SECS} seconds, got {0}")]
    IntervalOutOfRange(u64),
    #[error("invalid interval '{0}': expected whole seconds")]
    InvalidInterval(String),
    #[error("invalid agent URL '{0}'")]
    InvalidUrl(String),
    #[error("unsupported URL scheme '{0}' (use http or https)")]
    UnsupportedScheme(String),
}
