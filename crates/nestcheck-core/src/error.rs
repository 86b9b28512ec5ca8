//! Error types for nested container verification.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `VerifyError`.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Errors that abort verification of a single container.
///
/// Failures of individual entries inside a container are never reported
/// through this type; they are recorded as failing nested results instead.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is truncated, corrupted or otherwise unreadable.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Materializing an entry to its alias path failed.
    #[error("failed to materialize {path}: {source}")]
    Extraction {
        /// The alias path being written.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Verification was cancelled between entries.
    #[error("verification cancelled")]
    Cancelled,

    /// Container nesting exceeds the configured bound.
    #[error("container nesting too deep ({depth} > {max})")]
    NestingTooDeep {
        /// Depth of the container that was rejected.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_archive_display() {
        let err = VerifyError::InvalidArchive("truncated central directory".into());
        assert_eq!(err.to_string(), "invalid archive: truncated central directory");
    }

    #[test]
    fn test_extraction_error_keeps_source() {
        use std::error::Error;

        let err = VerifyError::Extraction {
            path: PathBuf::from("/tmp/x/abc/def.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("def.txt"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VerifyError = io_err.into();
        assert!(matches!(err, VerifyError::Io(_)));
    }

    #[test]
    fn test_nesting_too_deep_display() {
        let err = VerifyError::NestingTooDeep { depth: 17, max: 16 };
        assert_eq!(err.to_string(), "container nesting too deep (17 > 16)");
    }
}
