//! Error taxonomy for the extraction pipeline.
//!
//! Only [`ConfigError`] is fatal. Every [`ExtractError`] is scoped to a
//! single archive entry and degrades that entry to an empty contribution.

use thiserror::Error;

use crate::format::FormatTag;

/// Configuration problems that abort the locate step.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("configuration key `{0}` is missing or is not a /pattern/ literal")]
    MissingPattern(String),

    #[error("configuration key `{key}` holds an invalid pattern: {reason}")]
    InvalidPattern { key: String, reason: String },

    #[error("cannot read configuration from {location}: {reason}")]
    Read { location: String, reason: String },
}

/// Per-entry failures, recorded in the batch report and otherwise skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("cannot read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("cannot parse {path} as {format}: {reason}")]
    Parse {
        path: String,
        format: FormatTag,
        reason: String,
    },

    #[error("no extractor for {path} (detected format: {format})")]
    UnsupportedFormat { path: String, format: FormatTag },
}

impl ExtractError {
    /// The archive entry this error belongs to.
    pub fn path(&self) -> &str {
        match self {
            ExtractError::Read { path, .. }
            | ExtractError::Parse { path, .. }
            | ExtractError::UnsupportedFormat { path, .. } => path,
        }
    }
}
