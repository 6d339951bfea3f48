//! services/api/src/adapters/analysis_llm.rs
//!
//! This module contains the adapter for the article-analysis LLM.
//! It implements the `GenerativeModelService` port from the `core` crate by
//! talking to Gemini through its OpenAI-compatible endpoint.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use chartgenius_core::ports::{GenerativeModelService, PortError, PortResult, StructuredPrompt};
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerativeModelService` with JSON-schema constrained output.
#[derive(Clone)]
pub struct GeminiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiAnalysisAdapter {
    /// Creates a new `GeminiAnalysisAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds a client for Gemini's OpenAI-compatible API.
    ///
    /// The client never retries: a 429 or 5xx is returned on the first attempt.
    pub fn client_for(api_key: &str, api_base: &str) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        Client::with_config(config).with_backoff(no_retry)
    }
}

/// Whether an error message carries a throttling signal.
pub fn looks_rate_limited(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["429", "too many requests", "rate limit", "rate_limit", "resource_exhausted"]
        .iter()
        .any(|needle| message.contains(needle))
}

fn to_port_error(e: OpenAIError) -> PortError {
    let detail = format!("{e} {e:?}");
    if looks_rate_limited(&detail) {
        PortError::RateLimited(e.to_string())
    } else {
        PortError::Unexpected(e.to_string())
    }
}

//=========================================================================================
// `GenerativeModelService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerativeModelService for GeminiAnalysisAdapter {
    async fn generate_json(&self, request: &StructuredPrompt) -> PortResult<String> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.as_str())
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some("Content blocks of the enhanced article".to_string()),
                name: "content_blocks".to_string(),
                schema: Some(request.schema.clone()),
                strict: None,
            },
        };

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(response_format)
            .temperature(request.temperature)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(to_port_error)?;

        // An empty body is left for the analyzer to reject.
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        debug!(bytes = content.len(), model = %self.model, "analysis model responded");
        Ok(content)
    }
}
