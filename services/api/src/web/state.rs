//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and wires the core services to
//! their adapters.

use crate::config::{CacheMode, Config};
use chartgenius_core::{
    AnalysisCache, ArticleAnalyzer, CredentialHasher, DatabaseService, DocumentStore,
    GenerativeModelService, IdentityProvider, LruCache, ReportPipeline, UnboundedCache,
};
use chrono::Duration;
use std::sync::Arc;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityProvider,
    pub documents: DocumentStore,
    pub pipeline: ReportPipeline,
}

impl AppState {
    pub fn new(
        config: &Config,
        db: Arc<dyn DatabaseService>,
        model: Arc<dyn GenerativeModelService>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        let cache: Arc<dyn AnalysisCache> = match config.cache_mode {
            CacheMode::Unbounded => Arc::new(UnboundedCache::new()),
            CacheMode::Bounded(capacity) => Arc::new(LruCache::new(capacity)),
        };
        info!(cache = ?config.cache_mode, "analysis cache configured");

        let documents = DocumentStore::new(db.clone());
        let analyzer = ArticleAnalyzer::new(model, cache);
        let pipeline = ReportPipeline::new(analyzer, documents.clone(), config.min_input_chars);
        let identity = IdentityProvider::new(
            db,
            hasher,
            Duration::days(config.session_ttl_days),
        );

        Self {
            identity,
            documents,
            pipeline,
        }
    }
}
