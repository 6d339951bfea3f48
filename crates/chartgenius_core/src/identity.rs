//! crates/chartgenius_core/src/identity.rs
//!
//! Signup, login, logout and session resolution.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{AuthSession, User};
use crate::error::{CoreError, CoreResult};
use crate::ports::{CredentialHasher, DatabaseService, PortError};

#[derive(Clone)]
pub struct IdentityProvider {
    db: Arc<dyn DatabaseService>,
    hasher: Arc<dyn CredentialHasher>,
    session_ttl: Duration,
}

impl IdentityProvider {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        hasher: Arc<dyn CredentialHasher>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            db,
            hasher,
            session_ttl,
        }
    }

    /// Resolves a session token to its user. Never fails: a missing token,
    /// an expired session or a vanished user all resolve to `None`.
    pub async fn current_user(&self, token: Option<&str>) -> Option<User> {
        let token = token.filter(|t| !t.is_empty())?;

        let user_id = match self.db.validate_auth_session(token).await {
            Ok(user_id) => user_id,
            Err(PortError::NotFound(_)) => return None,
            Err(e) => {
                warn!("Failed to validate auth session: {}", e);
                return None;
            }
        };

        match self.db.get_user_by_id(user_id).await {
            Ok(user) => Some(user),
            Err(PortError::NotFound(_)) => None,
            Err(e) => {
                warn!("Failed to load session user {}: {}", user_id, e);
                None
            }
        }
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<(User, AuthSession)> {
        let credentials = match self.db.get_user_by_email(email).await {
            Ok(credentials) => credentials,
            Err(PortError::NotFound(_)) => return Err(CoreError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !self.hasher.verify(password, &credentials.hashed_password) {
            return Err(CoreError::InvalidCredentials);
        }

        let user = credentials.into_user();
        let session = self.open_session(user.id).await?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, session))
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> CoreResult<(User, AuthSession)> {
        match self.db.get_user_by_email(email).await {
            Ok(_) => return Err(CoreError::EmailTaken),
            Err(PortError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let hashed = self.hasher.hash(password)?;
        let user = self
            .db
            .create_user(name, email, &hashed)
            .await
            .map_err(|e| match e {
                // lost a race with a concurrent signup for the same email
                PortError::Conflict(_) => CoreError::EmailTaken,
                other => other.into(),
            })?;

        let session = self.open_session(user.id).await?;
        info!(user_id = %user.id, "user signed up");
        Ok((user, session))
    }

    /// Idempotent: logging out twice, or without a session, is fine.
    pub async fn logout(&self, token: Option<&str>) -> CoreResult<()> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(());
        };
        match self.db.delete_auth_session(token).await {
            Ok(()) | Err(PortError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn open_session(&self, user_id: Uuid) -> CoreResult<AuthSession> {
        let session = AuthSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: Utc::now() + self.session_ttl,
        };
        self.db
            .create_auth_session(&session.id, session.user_id, session.expires_at)
            .await?;
        Ok(session)
    }
}
