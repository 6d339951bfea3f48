//! services/api/src/error.rs
//!
//! Defines the primary error type for the API service and the mapping of core
//! errors onto HTTP responses.

use axum::http::StatusCode;
use chartgenius_core::{CoreError, PortError};
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The status code a core error is reported with.
pub fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CoreError::AuthRequired | CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoreError::EmailTaken => StatusCode::CONFLICT,
        CoreError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        CoreError::AnalysisFailure(_) => StatusCode::BAD_GATEWAY,
        CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Converts a core error into the `(status, message)` pair handlers return.
/// Storage details are logged, not shown to the user.
pub fn to_http(err: CoreError) -> (StatusCode, String) {
    let status = status_for(&err);
    match err {
        CoreError::Storage(e) => {
            error!("Storage failure: {:?}", e);
            (status, "Something went wrong. Please try again.".to_string())
        }
        other => {
            if status.is_server_error() {
                error!("Request failed: {}", other);
            }
            (status, other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_analysis_failures_map_to_distinct_statuses() {
        assert_eq!(status_for(&CoreError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            status_for(&CoreError::AnalysisFailure("bad".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let (status, body) = to_http(CoreError::Storage(PortError::Unexpected(
            "relation \"documents\" does not exist".into(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("documents"));
    }

    #[test]
    fn auth_errors_are_surfaced_verbatim() {
        let (status, body) = to_http(CoreError::EmailTaken);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, "Email already exists");
        assert_eq!(to_http(CoreError::AuthRequired).0, StatusCode::UNAUTHORIZED);
    }
}
