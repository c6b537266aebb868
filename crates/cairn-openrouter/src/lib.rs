// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter adapter for the Cairn memory engine.
//!
//! Implements both [`ProviderAdapter`] (chat completions, used for
//! rolling-window summarization) and [`EmbeddingAdapter`] (embeddings)
//! against the OpenRouter HTTP API.

mod wire;

use async_trait::async_trait;
use reqwest::StatusCode;

use cairn_config::OpenRouterConfig;
use cairn_core::traits::adapter::PluginAdapter;
use cairn_core::traits::{EmbeddingAdapter, ProviderAdapter};
use cairn_core::types::{
    AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus, ProviderRequest,
    ProviderResponse, TokenUsage,
};
use cairn_core::CairnError;

use wire::{
    ChatCompletionRequest, ChatCompletionResponse, EmbeddingsRequest, EmbeddingsResponse,
};

/// Adapter speaking the OpenRouter chat-completions and embeddings API.
#[derive(Debug)]
pub struct OpenRouterAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
}

impl OpenRouterAdapter {
    /// Creates an adapter from configuration.
    ///
    /// Fails when no API key is configured; network reachability is not
    /// checked here.
    pub fn new(config: &OpenRouterConfig) -> Result<Self, CairnError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            CairnError::Config("openrouter.api_key is required".to_string())
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            embedding_model: config.embedding_model.clone(),
        })
    }

    fn provider_err(message: impl Into<String>) -> CairnError {
        CairnError::Provider {
            message: message.into(),
            source: None,
        }
    }

    fn embedding_err(message: impl Into<String>) -> CairnError {
        CairnError::Embedding {
            message: message.into(),
            source: None,
        }
    }

    /// Reads the response body for error reporting, truncated to keep log
    /// lines bounded.
    async fn error_body(response: reqwest::Response) -> String {
        let mut body = response.text().await.unwrap_or_default();
        body.truncate(512);
        body
    }
}

#[async_trait]
impl PluginAdapter for OpenRouterAdapter {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, CairnError> {
        // Construction already validated credentials; avoid burning quota
        // on a probe request.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterAdapter {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, CairnError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest::from_provider_request(&request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CairnError::Provider {
                message: format!("chat completion request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            tracing::warn!(status = %status, "chat completion returned error status");
            return Err(Self::provider_err(format!(
                "chat completion failed with {status}: {body}"
            )));
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| CairnError::Provider {
                message: format!("chat completion response unparseable: {e}"),
                source: Some(Box::new(e)),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Self::provider_err("chat completion returned no choices"))?;

        let usage = parsed.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(ProviderResponse {
            id: parsed.id.unwrap_or_default(),
            content,
            model: parsed.model.unwrap_or(request.model),
            usage: usage.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl EmbeddingAdapter for OpenRouterAdapter {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, CairnError> {
        let url = format!("{}/embeddings", self.base_url);
        let body = EmbeddingsRequest {
            model: self.embedding_model.clone(),
            input: input.texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CairnError::Embedding {
                message: format!("embedding request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Self::embedding_err("embedding request rate limited"));
        }
        if !status.is_success() {
            let body = Self::error_body(response).await;
            tracing::warn!(status = %status, "embeddings returned error status");
            return Err(Self::embedding_err(format!(
                "embedding request failed with {status}: {body}"
            )));
        }

        let parsed: EmbeddingsResponse =
            response.json().await.map_err(|e| CairnError::Embedding {
                message: format!("embedding response unparseable: {e}"),
                source: Some(Box::new(e)),
            })?;

        // Response order is not contractual; sort by index.
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);
        let embeddings: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();
        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);

        if embeddings.is_empty() {
            return Err(Self::embedding_err("embedding response contained no data"));
        }

        Ok(EmbeddingOutput {
            embeddings,
            dimensions,
        })
    }
}
