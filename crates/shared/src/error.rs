//! Application-wide error type.
//!
//! Lower crates keep their own error enums and convert into [`AppError`]
//! where a transport adapter needs a status code and a stable error code.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced at the application boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// The addressed entity does not exist under the requested visibility.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller input was rejected.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A storage read or write failed.
    #[error("Storage failure: {0}")]
    Database(String),

    /// Storage is unreachable or not yet initialized.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Serializable error payload for transport adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl AppError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Unavailable(_) => 503,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable error code for response bodies.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "STORAGE_ERROR",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for errors caused by the caller rather than the system.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Builds the response payload.
    ///
    /// Server-side details stay in logs; only client errors echo their message.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            "An unexpected error occurred".to_string()
        };
        ErrorBody {
            code: self.error_code(),
            message,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
