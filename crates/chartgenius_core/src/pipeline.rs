//! crates/chartgenius_core/src/pipeline.rs
//!
//! The end-to-end flow behind an "analyze" request: input floor, analysis,
//! then either persistence (signed-in users) or a transient result (guests).

use tracing::info;
use uuid::Uuid;

use crate::analyzer::ArticleAnalyzer;
use crate::assembler::summarize_blocks;
use crate::documents::DocumentStore;
use crate::domain::{AnalysisResult, SavedDocument, User};
use crate::error::{CoreError, CoreResult};

pub const DEFAULT_MIN_INPUT_CHARS: usize = 50;

#[derive(Clone)]
pub struct ReportPipeline {
    analyzer: ArticleAnalyzer,
    documents: DocumentStore,
    min_input_chars: usize,
}

impl ReportPipeline {
    pub fn new(analyzer: ArticleAnalyzer, documents: DocumentStore, min_input_chars: usize) -> Self {
        Self {
            analyzer,
            documents,
            min_input_chars,
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub async fn run(&self, session: Option<&User>, text: &str) -> CoreResult<AnalysisResult> {
        let chars = text.trim().chars().count();
        if chars < self.min_input_chars {
            return Err(CoreError::InvalidInput(format!(
                "Please provide at least {} characters of text to analyze.",
                self.min_input_chars
            )));
        }

        let blocks = self.analyzer.analyze(text).await?;

        match session {
            Some(user) => {
                let document = self.documents.save(Some(user), text, blocks).await?;
                Ok(AnalysisResult::Persisted { document })
            }
            None => {
                info!("guest analysis, result not persisted");
                let (chart_count, direction) = summarize_blocks(text, &blocks);
                Ok(AnalysisResult::Ephemeral {
                    blocks,
                    original_text: text.to_string(),
                    chart_count,
                    direction,
                })
            }
        }
    }

    /// Re-analyses a saved document's original text into a new document.
    /// The old document is left untouched.
    pub async fn regenerate(
        &self,
        session: Option<&User>,
        document_id: Uuid,
    ) -> CoreResult<Option<SavedDocument>> {
        let Some(existing) = self.documents.get(session, document_id).await? else {
            return Ok(None);
        };
        match self.run(session, &existing.original_text).await? {
            AnalysisResult::Persisted { document } => Ok(Some(document)),
            // `get` only succeeds with a session, so `run` always persists here.
            AnalysisResult::Ephemeral { .. } => Err(CoreError::AuthRequired),
        }
    }
}
