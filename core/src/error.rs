//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace, plus the
//! `ApiError` kinds reported by the remote generation service.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The input document does not exist.
    #[from(ignore)]
    #[display("Spec file not found: {}", _0.display())]
    NotFound(PathBuf),

    /// The input document has an unsupported extension or could not be decoded.
    #[from(ignore)]
    #[display("Failed to parse spec file '{}': {cause}", path.display())]
    Format {
        /// Path of the offending document.
        path: PathBuf,
        /// What went wrong while decoding it.
        cause: FormatCause,
    },

    /// A credential is missing or was rejected by the remote service.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Configuration(String),

    /// No pricing is registered for the model identifier.
    #[from(ignore)]
    #[display("Unknown model: '{_0}'")]
    UnknownModel(String),

    /// A remote call failed and was not (or no longer) retried.
    #[display("API Error: {_0}")]
    Api(ApiError),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Format { cause, .. } => Some(cause),
            AppError::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// The underlying reason a document could not be decoded.
#[derive(Debug, Display)]
pub enum FormatCause {
    /// The file extension is not one of `.json`, `.yaml` or `.yml`.
    #[display("unsupported file extension '{_0}'")]
    UnsupportedExtension(String),

    /// JSON syntax error.
    #[display("{_0}")]
    Json(serde_json::Error),

    /// YAML syntax error.
    #[display("{_0}")]
    Yaml(serde_yaml::Error),

    /// The file content is not valid UTF-8.
    #[display("invalid UTF-8: {_0}")]
    Encoding(std::string::FromUtf8Error),

    /// The document decoded, but its root is not a mapping.
    #[display("document root must be a mapping")]
    NotAMapping,
}

impl std::error::Error for FormatCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatCause::Json(err) => Some(err),
            FormatCause::Yaml(err) => Some(err),
            FormatCause::Encoding(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure kinds reported by the remote generation service.
///
/// `RetryingCaller` consumes these; only `Authentication` is translated
/// (into `AppError::Configuration`), the others surface unchanged once the
/// retry budget is spent.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ApiError {
    /// Invalid or missing credentials (HTTP 401).
    #[display("authentication failed: {message}")]
    Authentication {
        /// Message reported by the service.
        message: String,
    },

    /// Too many requests (HTTP 429).
    #[display("rate limited: {message}")]
    RateLimited {
        /// Message reported by the service.
        message: String,
    },

    /// Server-side failure (HTTP status >= 500).
    #[display("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service.
        message: String,
    },

    /// Any other client-side rejection (4xx).
    #[display("request rejected ({status}): {message}")]
    Client {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service.
        message: String,
    },

    /// The request never produced a status (connection, TLS, body decoding).
    #[display("transport error: {_0}")]
    Transport(String),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Classifies an HTTP error status into one of the failure kinds.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => ApiError::Authentication { message },
            429 => ApiError::RateLimited { message },
            s if s >= 500 => ApiError::Server { status: s, message },
            s => ApiError::Client { status: s, message },
        }
    }

    /// HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { .. } => Some(401),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Server { status, .. } | ApiError::Client { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion() {
        // Test that String defaults to General, not Configuration
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_api_conversion() {
        let app_err: AppError = ApiError::Transport("reset".into()).into();
        assert!(matches!(app_err, AppError::Api(ApiError::Transport(_))));
    }

    #[test]
    fn test_not_found_display_names_path() {
        let err = AppError::NotFound(PathBuf::from("specs/missing.json"));
        assert_eq!(err.to_string(), "Spec file not found: specs/missing.json");
    }

    #[test]
    fn test_format_display_carries_cause() {
        let err = AppError::Format {
            path: PathBuf::from("spec.txt"),
            cause: FormatCause::UnsupportedExtension(".txt".into()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse spec file 'spec.txt': unsupported file extension '.txt'"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unknown_model_display() {
        let err = AppError::UnknownModel("gpt-4-turbo".into());
        assert_eq!(err.to_string(), "Unknown model: 'gpt-4-turbo'");
    }

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            ApiError::from_status(401, "bad key"),
            ApiError::Authentication { .. }
        ));
        assert!(matches!(
            ApiError::from_status(429, "slow down"),
            ApiError::RateLimited { .. }
        ));
        assert_eq!(
            ApiError::from_status(529, "overloaded"),
            ApiError::Server {
                status: 529,
                message: "overloaded".into()
            }
        );
        assert_eq!(ApiError::from_status(400, "bad").status(), Some(400));
        assert!(matches!(
            ApiError::from_status(403, "forbidden"),
            ApiError::Client { status: 403, .. }
        ));
    }
}
