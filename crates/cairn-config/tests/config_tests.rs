// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Cairn configuration system.

use std::path::PathBuf;

use cairn_config::load_config_from_str;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_cairn_config() {
    let toml = r#"
[agent]
name = "test-agent"
log_level = "debug"

[memory]
persist_dir = "/tmp/cairn-test/vector_db"
rolling_window = true
rolling_window_threshold = 8
context_doc_results = 3
context_conv_results = 1
summary_max_tokens = 512

[openrouter]
api_key = "sk-or-123"
base_url = "http://localhost:9999/api/v1"
chat_model = "anthropic/claude-3-haiku"
embedding_model = "openai/text-embedding-3-small"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-agent");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(
        config.memory.persist_dir,
        PathBuf::from("/tmp/cairn-test/vector_db")
    );
    assert!(config.memory.rolling_window);
    assert_eq!(config.memory.rolling_window_threshold, 8);
    assert_eq!(config.memory.context_doc_results, 3);
    assert_eq!(config.memory.context_conv_results, 1);
    assert_eq!(config.memory.summary_max_tokens, 512);
    assert_eq!(config.openrouter.api_key.as_deref(), Some("sk-or-123"));
    assert_eq!(config.openrouter.base_url, "http://localhost:9999/api/v1");
    assert_eq!(config.openrouter.chat_model, "anthropic/claude-3-haiku");
}

/// Empty TOML yields compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML should deserialize");
    assert_eq!(config.agent.name, "cairn");
    assert_eq!(config.agent.log_level, "info");
    assert!(!config.memory.rolling_window);
    assert_eq!(config.memory.rolling_window_threshold, 10);
    assert_eq!(config.memory.context_doc_results, 2);
    assert_eq!(config.memory.context_conv_results, 2);
    assert_eq!(config.memory.summary_max_tokens, 1000);
    assert_eq!(config.memory.summary_model, "deepseek/deepseek-chat");
    assert!(config.openrouter.api_key.is_none());
    assert_eq!(config.openrouter.base_url, "https://openrouter.ai/api/v1");
    assert_eq!(config.openrouter.chat_model, "deepseek/deepseek-chat");
    assert_eq!(
        config.openrouter.embedding_model,
        "openai/text-embedding-3-small"
    );
}

/// Unknown field in a section is rejected by deny_unknown_fields.
#[test]
fn unknown_field_is_rejected() {
    let toml = r#"
[memory]
rolling_windw = true
"#;
    let result = load_config_from_str(toml);
    assert!(result.is_err(), "typo'd key should be rejected");
}

/// Partial section keeps defaults for unspecified fields.
#[test]
fn partial_section_keeps_defaults() {
    let toml = r#"
[memory]
rolling_window = true
"#;
    let config = load_config_from_str(toml).expect("partial section should deserialize");
    assert!(config.memory.rolling_window);
    assert_eq!(config.memory.rolling_window_threshold, 10);
}
