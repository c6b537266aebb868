// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Cairn adapter traits and engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Embedding,
    Storage,
}

// --- Provider types ---

/// A single chat message in a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// Message role: "user", "assistant", or "system".
    pub role: String,
    /// Plain-text message content.
    pub content: String,
}

/// A request to a text-generation provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Model identifier, e.g. "deepseek/deepseek-chat".
    pub model: String,
    /// Conversation messages, oldest first.
    pub messages: Vec<ProviderMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// A response from a text-generation provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Provider-assigned response id.
    pub id: String,
    /// Generated text content.
    pub content: String,
    /// Model that produced the response.
    pub model: String,
    /// Token usage for the call.
    pub usage: TokenUsage,
}

/// Token usage reported by a provider call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Texts to embed, one vector produced per text.
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One embedding per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Dimensionality of the produced vectors.
    pub dimensions: usize,
}
