//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for codelint operations
///
/// Only conditions that abort a whole call or reject a registration are
/// represented here. Failures of an individual analyzer are captured as
/// [`Outcome::ExecutionError`](crate::core::types::Outcome) results instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The artifact to analyze does not exist
    #[error("File not found: {}", path.display())]
    TargetNotFound { path: PathBuf },

    /// Registration with an empty name or empty invocation
    #[error("Invalid analyzer definition: {reason}")]
    InvalidDefinition { reason: String },

    /// Source content could not be written to a temporary artifact
    #[error("Failed to materialize source: {message}")]
    Materialization {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a target-not-found error for `path`
    pub fn target_not_found(path: impl Into<PathBuf>) -> Self {
        Self::TargetNotFound { path: path.into() }
    }

    /// Create an invalid-definition error with a reason
    pub fn invalid_definition(reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            reason: reason.into(),
        }
    }

    /// Wrap an I/O failure that happened while materializing source content
    pub fn materialization(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Materialization {
            message: message.into(),
            source,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
