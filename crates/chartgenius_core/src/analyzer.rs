//! crates/chartgenius_core/src/analyzer.rs
//!
//! Turns raw article text into an ordered sequence of text and chart blocks by
//! calling the generative model, validating its structured output and memoising
//! the result.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::AnalysisCache;
use crate::domain::{BlockBody, ChartConfig, ChartDataPoint, ChartType, ContentBlock};
use crate::error::{CoreError, CoreResult};
use crate::ports::{GenerativeModelService, PortError};
use crate::prompt::analysis_request;

//=========================================================================================
// Raw Model Output
//=========================================================================================

// Lenient mirrors of the response schema. Everything is optional here so that
// validation can say exactly what was missing.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<String>,
    chart_config: Option<RawChartConfig>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChartConfig {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    chart_type: Option<String>,
    x_axis_label: Option<String>,
    y_axis_label: Option<String>,
    data: Option<Vec<ChartDataPoint>>,
    color: Option<String>,
}

impl RawChartConfig {
    fn into_config(self, index: usize) -> CoreResult<ChartConfig> {
        let type_name = self
            .chart_type
            .ok_or_else(|| invalid(index, "chart has no type"))?;
        let chart_type = ChartType::from_name(&type_name)
            .ok_or_else(|| invalid(index, &format!("unknown chart type '{type_name}'")))?;

        let data = self.data.unwrap_or_default();
        if data.is_empty() {
            return Err(invalid(index, "chart has no data points"));
        }

        Ok(ChartConfig {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            chart_type,
            x_axis_label: self.x_axis_label.unwrap_or_default(),
            y_axis_label: self.y_axis_label.unwrap_or_default(),
            data,
            color: self.color.filter(|c| !c.trim().is_empty()),
        })
    }
}

impl RawBlock {
    fn into_body(self, index: usize) -> CoreResult<BlockBody> {
        match self.kind.as_deref() {
            Some("text") => {
                let content = self
                    .content
                    .ok_or_else(|| invalid(index, "text block has no content"))?;
                Ok(BlockBody::Text { content })
            }
            Some("chart") => {
                let raw = self
                    .chart_config
                    .ok_or_else(|| invalid(index, "chart block has no chartConfig"))?;
                Ok(BlockBody::Chart {
                    chart_config: raw.into_config(index)?,
                })
            }
            Some(other) => Err(invalid(index, &format!("unknown block type '{other}'"))),
            None => Err(invalid(index, "block has no type")),
        }
    }
}

fn invalid(index: usize, reason: &str) -> CoreError {
    CoreError::AnalysisFailure(format!(
        "Analysis failed to generate valid blocks (block {index}: {reason})."
    ))
}

/// Parses and validates a model response, assigning fresh ids in order.
///
/// A single malformed element rejects the whole response. Two charts in a
/// row are accepted as-is.
pub fn normalize_response(body: &str) -> CoreResult<Vec<ContentBlock>> {
    if body.trim().is_empty() {
        return Err(CoreError::AnalysisFailure(
            "No response from the model".to_string(),
        ));
    }

    let parsed: Value = serde_json::from_str(body).map_err(|e| {
        CoreError::AnalysisFailure(format!("The model returned malformed JSON: {e}"))
    })?;

    let items = match parsed {
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(CoreError::AnalysisFailure(
                "Analysis failed to generate valid blocks.".to_string(),
            ))
        }
    };

    let batch = Uuid::new_v4().simple().to_string();
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawBlock = serde_json::from_value(item)
                .map_err(|e| invalid(index, &e.to_string()))?;
            Ok(ContentBlock {
                id: format!("block-{index}-{batch}"),
                body: raw.into_body(index)?,
            })
        })
        .collect()
}

//=========================================================================================
// The Analyzer
//=========================================================================================

/// Runs an article through the generative model, consulting the cache first.
#[derive(Clone)]
pub struct ArticleAnalyzer {
    model: Arc<dyn GenerativeModelService>,
    cache: Arc<dyn AnalysisCache>,
}

impl ArticleAnalyzer {
    pub fn new(model: Arc<dyn GenerativeModelService>, cache: Arc<dyn AnalysisCache>) -> Self {
        Self { model, cache }
    }

    /// Produces the block sequence for `text`.
    ///
    /// Identical trimmed input within the process lifetime is answered from
    /// the cache with the same ids. Nothing is retried here.
    pub async fn analyze(&self, text: &str) -> CoreResult<Vec<ContentBlock>> {
        let key = text.trim();
        if let Some(blocks) = self.cache.get(key) {
            debug!(chars = key.chars().count(), "analysis cache hit");
            return Ok(blocks);
        }
        debug!(chars = key.chars().count(), "analysis cache miss, calling model");

        let request = analysis_request(text);
        let body = self.model.generate_json(&request).await.map_err(|e| {
            warn!("Model call failed: {}", e);
            match e {
                PortError::RateLimited(_) => CoreError::RateLimited,
                PortError::Unexpected(message)
                | PortError::NotFound(message)
                | PortError::Conflict(message) => CoreError::AnalysisFailure(message),
            }
        })?;

        let blocks = normalize_response(&body).map_err(|e| {
            warn!("Rejected model output: {}", e);
            e
        })?;

        let charts = blocks.iter().filter(|b| b.is_chart()).count();
        info!(blocks = blocks.len(), charts, "article analyzed");

        self.cache.put(key.to_string(), blocks.clone());
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::UnboundedCache;
    use crate::ports::{PortResult, StructuredPrompt};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedModel {
        reply: Box<dyn Fn() -> PortResult<String> + Send + Sync>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(reply: impl Fn() -> PortResult<String> + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                reply: Box::new(reply),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerativeModelService for ScriptedModel {
        async fn generate_json(&self, request: &StructuredPrompt) -> PortResult<String> {
            assert!(request.prompt.contains("Input Text:"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    fn revenue_reply() -> String {
        json!([
            { "type": "text", "content": "Revenue: Q1 $1M, Q2 $1.5M, Q3 $2M" },
            { "type": "chart", "chartConfig": {
                "title": "Revenue by quarter",
                "type": "bar",
                "xAxisLabel": "Quarter",
                "yAxisLabel": "USD (M)",
                "data": [
                    { "name": "Q1 Revenue", "value": 1.0 },
                    { "name": "Q2 Revenue", "value": 1.5 },
                    { "name": "Q3 Revenue", "value": 2.0 }
                ]
            }}
        ])
        .to_string()
    }

    fn analyzer(model: Arc<ScriptedModel>) -> ArticleAnalyzer {
        ArticleAnalyzer::new(model, Arc::new(UnboundedCache::new()))
    }

    #[tokio::test]
    async fn analyze_preserves_order_and_assigns_ids() {
        let model = ScriptedModel::new(|| Ok(revenue_reply()));
        let blocks = analyzer(model.clone()).analyze("Revenue: Q1 $1M").await.unwrap();

        assert_eq!(blocks.len(), 2);
        assert!(!blocks[0].is_chart());
        assert!(blocks[1].is_chart());
        assert!(blocks[0].id.starts_with("block-0-"));
        assert!(blocks[1].id.starts_with("block-1-"));
        assert_ne!(blocks[0].id, blocks[1].id);
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache_with_same_ids() {
        let model = ScriptedModel::new(|| Ok(revenue_reply()));
        let analyzer = analyzer(model.clone());

        let first = analyzer.analyze("  Revenue: Q1 $1M  ").await.unwrap();
        let second = analyzer.analyze("Revenue: Q1 $1M").await.unwrap();

        assert_eq!(model.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn model_supplied_ids_are_replaced() {
        let model = ScriptedModel::new(|| {
            Ok(json!([{ "id": "from-model", "type": "text", "content": "hello" }]).to_string())
        });
        let blocks = analyzer(model).analyze("hello").await.unwrap();
        assert_ne!(blocks[0].id, "from-model");
    }

    #[tokio::test]
    async fn rate_limit_gets_a_distinct_friendly_message() {
        let model = ScriptedModel::new(|| Err(PortError::RateLimited("429 Too Many Requests".into())));
        let err = analyzer(model).analyze("text").await.unwrap_err();

        assert!(matches!(err, CoreError::RateLimited));
        let message = err.to_string();
        assert!(message.contains("too many requests"));
        assert!(message.contains("try again"));
    }

    #[tokio::test]
    async fn other_model_errors_pass_their_message_through() {
        let model = ScriptedModel::new(|| Err(PortError::Unexpected("connection reset".into())));
        let err = analyzer(model).analyze("text").await.unwrap_err();
        assert!(matches!(err, CoreError::AnalysisFailure(ref m) if m == "connection reset"));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let model = ScriptedModel::new(|| Ok("not json".to_string()));
        let analyzer = analyzer(model.clone());
        assert!(analyzer.analyze("same").await.is_err());
        assert!(analyzer.analyze("same").await.is_err());
        assert_eq!(model.calls(), 2);
    }

    #[test]
    fn empty_or_non_array_responses_are_rejected() {
        for body in ["", "   ", "[]", "{}", "{\"type\":\"text\"}", "null"] {
            let err = normalize_response(body).unwrap_err();
            assert!(matches!(err, CoreError::AnalysisFailure(_)), "{body:?}");
        }
    }

    #[test]
    fn chart_without_data_is_rejected() {
        let missing = json!([{ "type": "chart", "chartConfig": {
            "title": "t", "type": "bar", "xAxisLabel": "x", "yAxisLabel": "y"
        }}]);
        let empty = json!([{ "type": "chart", "chartConfig": {
            "title": "t", "type": "bar", "xAxisLabel": "x", "yAxisLabel": "y", "data": []
        }}]);
        assert!(normalize_response(&missing.to_string()).is_err());
        assert!(normalize_response(&empty.to_string()).is_err());
    }

    #[test]
    fn malformed_blocks_are_rejected() {
        let cases = [
            json!([{ "type": "text" }]),
            json!([{ "type": "chart" }]),
            json!([{ "type": "table", "content": "x" }]),
            json!([{ "content": "x" }]),
            json!([{ "type": "chart", "chartConfig": {
                "title": "t", "type": "scatter", "data": [{ "name": "a", "value": 1 }]
            }}]),
            json!([{ "type": "chart", "chartConfig": {
                "title": "t", "type": "pie", "data": [{ "name": "a" }]
            }}]),
        ];
        for case in cases {
            assert!(normalize_response(&case.to_string()).is_err(), "{case}");
        }
    }

    #[test]
    fn consecutive_charts_pass_through() {
        let chart = json!({ "type": "chart", "chartConfig": {
            "title": "Share", "type": "radialBar", "xAxisLabel": "", "yAxisLabel": "%",
            "data": [{ "name": "Completion", "value": 72 }], "color": "#4F46E5"
        }});
        let body = json!([{ "type": "text", "content": "p" }, chart.clone(), chart]).to_string();
        let blocks = normalize_response(&body).unwrap();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[1].is_chart() && blocks[2].is_chart());
        match &blocks[2].body {
            BlockBody::Chart { chart_config } => {
                assert_eq!(chart_config.chart_type, ChartType::RadialBar);
                assert_eq!(chart_config.color.as_deref(), Some("#4F46E5"));
                assert_eq!(chart_config.description, "");
            }
            BlockBody::Text { .. } => panic!("expected a chart"),
        }
    }
}
