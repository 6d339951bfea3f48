//! crates/chartgenius_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{SavedDocument, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A single structured-output request to a generative model.
#[derive(Debug, Clone)]
pub struct StructuredPrompt {
    pub prompt: String,
    /// JSON schema the response body must satisfy.
    pub schema: Value,
    pub temperature: f32,
}

#[async_trait]
pub trait GenerativeModelService: Send + Sync {
    /// Returns the raw JSON text produced by the model.
    ///
    /// Implementations report throttling as `PortError::RateLimited`.
    async fn generate_json(&self, request: &StructuredPrompt) -> PortResult<String>;
}

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users ---
    /// Fails with `PortError::Conflict` when the email is already registered.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owning user id of an unexpired session.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Documents ---
    async fn insert_document(&self, document: &SavedDocument) -> PortResult<()>;

    async fn get_document_by_id(&self, document_id: Uuid) -> PortResult<SavedDocument>;

    /// All documents owned by `user_id`, newest first.
    async fn get_documents_by_user(&self, user_id: Uuid) -> PortResult<Vec<SavedDocument>>;

    async fn delete_document(&self, document_id: Uuid) -> PortResult<()>;

    // --- Maintenance ---
    /// Empties every collection.
    async fn clear_all(&self) -> PortResult<()>;
}

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> PortResult<String>;

    /// True iff `password` matches `hashed`.
    fn verify(&self, password: &str, hashed: &str) -> bool;
}
