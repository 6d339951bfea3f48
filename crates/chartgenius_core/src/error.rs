//! crates/chartgenius_core/src/error.rs
//!
//! The error taxonomy surfaced by the analysis pipeline and the identity flow.

use crate::ports::PortError;

/// Errors returned by the core services.
///
/// Ownership mismatches on documents are deliberately absent here: they
/// resolve to "not found" or a no-op instead.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The model output could not be turned into a valid block sequence,
    /// or the model call failed for a reason other than throttling.
    #[error("{0}")]
    AnalysisFailure(String),

    #[error("We're receiving too many requests. Please try again in a moment.")]
    RateLimited,

    #[error("User must be logged in to save documents")]
    AuthRequired,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailTaken,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

pub type CoreResult<T> = Result<T, CoreError>;
