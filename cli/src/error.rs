#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use apidoc_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure reported by the core library.
    #[display("{}", _0)]
    App(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// `General(String)` carries no source, so `source()` is written out by hand.
impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            CliError::App(err) => Some(err),
            CliError::General(_) => None,
        }
    }
}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_app_errors_display_unprefixed() {
        let err: CliError = AppError::NotFound(PathBuf::from("missing.yaml")).into();
        assert_eq!(err.to_string(), "Spec file not found: missing.yaml");
    }

    #[test]
    fn test_io_error_wraps() {
        let err: CliError = std::io::Error::other("disk full").into();
        assert_eq!(err.to_string(), "IO Error: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}
