//! Error types for pattern registration

use crate::patterns::PatternKind;
use thiserror::Error;

/// Errors that can occur while configuring the pattern registry.
///
/// Parsing itself never fails; every pattern is validated when it is
/// registered.
#[derive(Error, Debug)]
pub enum PatternError {
    /// A custom pattern is not a valid regular expression
    #[error("Invalid {kind} pattern `{pattern}`: {source}")]
    InvalidRegex {
        kind: PatternKind,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A pattern configuration document could not be decoded
    #[error("Invalid pattern configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for pattern registration operations
pub type Result<T> = std::result::Result<T, PatternError>;
