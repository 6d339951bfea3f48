//! Shared fixtures for the integration tests: an in-memory app and a model
//! that replays a fixed answer.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api_lib::adapters::{Argon2Hasher, MemoryDbAdapter};
use api_lib::config::{CacheMode, Config};
use api_lib::web::state::AppState;
use async_trait::async_trait;
use chartgenius_core::{GenerativeModelService, PortResult, StructuredPrompt, User};
use serde_json::json;
use tracing::Level;

pub const REVENUE_TEXT: &str = "Revenue: Q1 $1M, Q2 $1.5M, Q3 $2M";

pub struct ScriptedModel {
    reply: Box<dyn Fn() -> PortResult<String> + Send + Sync>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(reply: impl Fn() -> PortResult<String> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn revenue() -> Arc<Self> {
        Self::new(|| Ok(revenue_reply()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeModelService for ScriptedModel {
    async fn generate_json(&self, _request: &StructuredPrompt) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

/// One text block followed by a three-point bar chart.
pub fn revenue_reply() -> String {
    json!([
        { "type": "text", "content": REVENUE_TEXT },
        { "type": "chart", "chartConfig": {
            "title": "Quarterly revenue",
            "description": "Revenue doubled between Q1 and Q3",
            "type": "bar",
            "xAxisLabel": "Quarter",
            "yAxisLabel": "Revenue (USD M)",
            "data": [
                { "name": "Q1 Revenue", "value": 1.0 },
                { "name": "Q2 Revenue", "value": 1.5 },
                { "name": "Q3 Revenue", "value": 2.0 }
            ]
        }}
    ])
    .to_string()
}

pub fn test_config(min_input_chars: usize) -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: None,
        log_level: Level::DEBUG,
        gemini_api_key: None,
        gemini_base_url: "http://localhost".to_string(),
        analysis_model: "test-model".to_string(),
        cache_mode: CacheMode::Bounded(16),
        min_input_chars,
        session_ttl_days: 30,
        cors_origin: "http://localhost:3000".to_string(),
    }
}

pub struct TestApp {
    pub state: AppState,
    pub db: Arc<MemoryDbAdapter>,
    pub model: Arc<ScriptedModel>,
}

pub fn app_with(model: Arc<ScriptedModel>, min_input_chars: usize) -> TestApp {
    let db = Arc::new(MemoryDbAdapter::new());
    let state = AppState::new(
        &test_config(min_input_chars),
        db.clone(),
        model.clone(),
        Arc::new(Argon2Hasher),
    );
    TestApp { state, db, model }
}

/// An app whose input floor admits the short revenue sample.
pub fn app() -> TestApp {
    app_with(ScriptedModel::revenue(), 10)
}

pub async fn signed_up(app: &TestApp, email: &str) -> User {
    let (user, _session) = app
        .state
        .identity
        .signup("Test User", email, "hunter22")
        .await
        .unwrap();
    user
}
