//! Structured error types for the Aequorea workspace.

use thiserror::Error;

/// Unified error type for all Aequorea operations.
#[derive(Debug, Error)]
pub enum AequoreaError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed input record)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A pipeline stage was invoked on a graph missing a prior stage
    #[error("precondition violation: {0}")]
    Precondition(String),

    /// Two fixed-length values of different lengths were combined
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the Aequorea workspace.
pub type Result<T> = std::result::Result<T, AequoreaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = AequoreaError::Parse("bad counts line".into());
        assert_eq!(e.to_string(), "parse error: bad counts line");

        let e = AequoreaError::DimensionMismatch { left: 881, right: 1024 };
        assert_eq!(e.to_string(), "dimension mismatch: 881 vs 1024");
    }

    #[test]
    fn io_error_converts() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/aequorea")?)
        }
        assert!(matches!(read_missing().unwrap_err(), AequoreaError::Io(_)));
    }
}
