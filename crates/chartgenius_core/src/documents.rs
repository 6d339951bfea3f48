//! crates/chartgenius_core/src/documents.rs
//!
//! Per-user document persistence on top of the `DatabaseService` port.
//! Every read and delete checks ownership against the resolved session; a
//! mismatch looks exactly like a missing document.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::assembler::assemble;
use crate::domain::{ContentBlock, SavedDocument, User, WorkspaceSummary};
use crate::error::{CoreError, CoreResult};
use crate::ports::{DatabaseService, PortError};

const RECENT_DOCUMENTS: usize = 3;

#[derive(Clone)]
pub struct DocumentStore {
    db: Arc<dyn DatabaseService>,
}

impl DocumentStore {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    /// Assembles and persists a document for the session's user.
    pub async fn save(
        &self,
        session: Option<&User>,
        original_text: &str,
        blocks: Vec<ContentBlock>,
    ) -> CoreResult<SavedDocument> {
        let user = session.ok_or(CoreError::AuthRequired)?;
        let document = assemble(user.id, original_text, blocks);
        self.db.insert_document(&document).await?;
        info!(
            document_id = %document.id,
            user_id = %user.id,
            charts = document.chart_count,
            "document saved"
        );
        Ok(document)
    }

    /// The session user's documents, newest first.
    pub async fn list(&self, session: Option<&User>) -> CoreResult<Vec<SavedDocument>> {
        let Some(user) = session else {
            return Ok(Vec::new());
        };
        let mut documents = self.db.get_documents_by_user(user.id).await?;
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    pub async fn get(
        &self,
        session: Option<&User>,
        document_id: Uuid,
    ) -> CoreResult<Option<SavedDocument>> {
        let Some(user) = session else {
            return Ok(None);
        };
        match self.db.get_document_by_id(document_id).await {
            Ok(document) if document.user_id == user.id => Ok(Some(document)),
            Ok(_) => {
                debug!(%document_id, "document hidden from non-owner");
                Ok(None)
            }
            Err(PortError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the document if the session owns it; otherwise does nothing.
    pub async fn delete(&self, session: Option<&User>, document_id: Uuid) -> CoreResult<()> {
        if self.get(session, document_id).await?.is_none() {
            return Ok(());
        }
        match self.db.delete_document(document_id).await {
            Ok(()) | Err(PortError::NotFound(_)) => {
                info!(%document_id, "document deleted");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Dashboard totals plus the most recent documents.
    pub async fn summary(&self, session: Option<&User>) -> CoreResult<WorkspaceSummary> {
        let documents = self.list(session).await?;
        Ok(WorkspaceSummary {
            total_documents: documents.len(),
            total_charts: documents.iter().map(|d| d.chart_count).sum(),
            recent: documents.into_iter().take(RECENT_DOCUMENTS).collect(),
        })
    }
}
