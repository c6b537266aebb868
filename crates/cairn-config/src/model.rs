// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Cairn memory engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Cairn configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CairnConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Memory engine and retrieval settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// OpenRouter API settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "cairn".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Memory engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Directory holding the collection files (`documents.json`,
    /// `conversations.json`). Defaults to the XDG data dir.
    #[serde(default = "default_persist_dir")]
    pub persist_dir: PathBuf,

    /// Enable rolling-window compaction of old conversation turns.
    #[serde(default)]
    pub rolling_window: bool,

    /// Number of stored conversation turns that triggers compaction.
    /// Half of this (rounded down) are folded into one summary.
    #[serde(default = "default_rolling_window_threshold")]
    pub rolling_window_threshold: usize,

    /// Number of document matches included in assembled query context.
    #[serde(default = "default_context_doc_results")]
    pub context_doc_results: usize,

    /// Number of conversation matches included in assembled query context.
    #[serde(default = "default_context_conv_results")]
    pub context_conv_results: usize,

    /// Maximum tokens granted to the summarization call during compaction.
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,

    /// Model used for the summarization call during compaction.
    #[serde(default = "default_summary_model")]
    pub summary_model: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            persist_dir: default_persist_dir(),
            rolling_window: false,
            rolling_window_threshold: default_rolling_window_threshold(),
            context_doc_results: default_context_doc_results(),
            context_conv_results: default_context_conv_results(),
            summary_max_tokens: default_summary_max_tokens(),
            summary_model: default_summary_model(),
        }
    }
}

fn default_summary_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

fn default_persist_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cairn/vector_db")
}

fn default_rolling_window_threshold() -> usize {
    10
}

fn default_context_doc_results() -> usize {
    2
}

fn default_context_conv_results() -> usize {
    2
}

fn default_summary_max_tokens() -> u32 {
    1000
}

/// OpenRouter API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// API key. Required to construct the OpenRouter adapter.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat model used for summarization.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_chat_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

fn default_embedding_model() -> String {
    "openai/text-embedding-3-small".to_string()
}
