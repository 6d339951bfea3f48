//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port. Used when no
//! `DATABASE_URL` is configured and by the integration tests. Data is lost on
//! restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chartgenius_core::domain::{SavedDocument, User, UserCredentials};
use chartgenius_core::ports::{DatabaseService, PortError, PortResult};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, UserCredentials>,
    // unique secondary index: email -> user id
    users_by_email: HashMap<String, Uuid>,
    auth_sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    documents: HashMap<Uuid, SavedDocument>,
}

/// A `DatabaseService` backed by hash maps behind a single async lock.
#[derive(Default)]
pub struct MemoryDbAdapter {
    inner: RwLock<Collections>,
}

impl MemoryDbAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseService for MemoryDbAdapter {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut db = self.inner.write().await;
        if db.users_by_email.contains_key(email) {
            return Err(PortError::Conflict(format!("Email {} already registered", email)));
        }
        let credentials = UserCredentials {
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        db.users_by_email
            .insert(credentials.email.clone(), credentials.user_id);
        db.users.insert(credentials.user_id, credentials.clone());
        Ok(credentials.into_user())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        self.inner
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .map(UserCredentials::into_user)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let db = self.inner.read().await;
        db.users_by_email
            .get(email)
            .and_then(|id| db.users.get(id))
            .cloned()
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.inner
            .write()
            .await
            .auth_sessions
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        match self.inner.read().await.auth_sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok(*user_id),
            _ => Err(PortError::NotFound(
                "Auth session not found or expired".to_string(),
            )),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.inner.write().await.auth_sessions.remove(session_id);
        Ok(())
    }

    async fn insert_document(&self, document: &SavedDocument) -> PortResult<()> {
        let mut db = self.inner.write().await;
        if db.documents.contains_key(&document.id) {
            return Err(PortError::Conflict(format!(
                "Document {} already exists",
                document.id
            )));
        }
        db.documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn get_document_by_id(&self, document_id: Uuid) -> PortResult<SavedDocument> {
        self.inner
            .read()
            .await
            .documents
            .get(&document_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Document {} not found", document_id)))
    }

    async fn get_documents_by_user(&self, user_id: Uuid) -> PortResult<Vec<SavedDocument>> {
        let mut documents: Vec<SavedDocument> = self
            .inner
            .read()
            .await
            .documents
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn delete_document(&self, document_id: Uuid) -> PortResult<()> {
        self.inner
            .write()
            .await
            .documents
            .remove(&document_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("Document {} not found", document_id)))
    }

    async fn clear_all(&self) -> PortResult<()> {
        *self.inner.write().await = Collections::default();
        Ok(())
    }
}
