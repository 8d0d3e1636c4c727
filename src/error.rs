//! Error types for manifest builds.
//!
//! Missing source files are not represented here: they are logged as
//! warnings and dropped from concatenation, never aborting a run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a manifest build.
#[derive(Debug, Error)]
pub enum BusterError {
    /// A custom digest function resolved to a non-string value.
    #[error("return value of the digest function must be a string, got {0}")]
    InvalidAlgorithmResult(String),

    /// The formatter resolved to a non-string value.
    #[error("return value of the formatter must be a string, got {0}")]
    InvalidFormatterResult(String),

    /// A custom digest, transform, or formatter function failed.
    #[error("policy function failed: {0}")]
    Policy(String),

    /// Reading a source or writing a destination or manifest failed.
    #[error("failed to {action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A hashing task panicked or was aborted before settling.
    #[error("hashing task failed to settle: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Task options could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BusterError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_algorithm_result_names_offending_type() {
        let err = BusterError::InvalidAlgorithmResult("number".to_string());
        assert_eq!(
            err.to_string(),
            "return value of the digest function must be a string, got number"
        );
    }

    #[test]
    fn test_io_error_carries_path_context() {
        let err = BusterError::io(
            "read source",
            "assets/app.js",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let message = err.to_string();
        assert!(message.contains("read source"));
        assert!(message.contains("assets/app.js"));
    }
}
