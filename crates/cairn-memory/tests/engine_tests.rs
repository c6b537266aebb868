// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the memory engine: retrieval ordering, context
//! assembly, persistence across restarts, and rolling-window compaction.

use std::collections::HashMap;
use std::sync::Arc;

use cairn_config::MemoryConfig;
use cairn_core::types::SessionId;
use cairn_memory::MemoryEngine;
use cairn_test_utils::{MockEmbedder, MockProvider};
use cairn_vector::{Metadata, MetadataValue};

fn config(dir: &std::path::Path, rolling_window: bool, threshold: usize) -> MemoryConfig {
    MemoryConfig {
        persist_dir: dir.to_path_buf(),
        rolling_window,
        rolling_window_threshold: threshold,
        ..MemoryConfig::default()
    }
}

fn session() -> SessionId {
    SessionId("session-1".to_string())
}

/// Fills the engine with `n` distinct conversation turns.
async fn add_turns(engine: &MemoryEngine, n: usize) {
    for i in 0..n {
        engine
            .add_conversation(
                &format!("question {i}"),
                &format!("answer {i}"),
                &session(),
                None,
            )
            .await
            .expect("add turn");
    }
}

#[tokio::test]
async fn documents_round_trip_across_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let embedder = Arc::new(MockEmbedder::new());
    let provider = Arc::new(MockProvider::new());

    let engine = MemoryEngine::open(
        config(dir.path(), false, 10),
        embedder.clone(),
        provider.clone(),
    )
    .await;
    engine
        .add_document("first document", None, Some("d1".to_string()))
        .await
        .expect("add");
    engine
        .add_document("second document", None, Some("d2".to_string()))
        .await
        .expect("add");
    drop(engine);

    let reopened = MemoryEngine::open(config(dir.path(), false, 10), embedder, provider).await;
    let records = reopened.list_knowledge().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "d1");
    assert_eq!(records[0].content, "first document");
    assert_eq!(records[1].id, "d2");
    assert_eq!(records[1].content, "second document");
}

#[tokio::test]
async fn search_returns_nearest_documents_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let vectors: HashMap<String, Vec<f32>> = [
        ("doc a".to_string(), vec![1.0, 0.0]),
        ("doc b".to_string(), vec![0.0, 1.0]),
        ("doc c".to_string(), vec![0.9, 0.1]),
        ("the query".to_string(), vec![1.0, 0.0]),
    ]
    .into_iter()
    .collect();

    let engine = MemoryEngine::open(
        config(dir.path(), false, 10),
        Arc::new(MockEmbedder::with_vectors(vectors)),
        Arc::new(MockProvider::new()),
    )
    .await;

    engine.add_document("doc a", None, None).await.expect("add");
    engine.add_document("doc b", None, None).await.expect("add");
    engine.add_document("doc c", None, None).await.expect("add");

    let results = engine.search_documents("the query", 2).await.expect("search");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "doc a");
    assert_eq!(results[1].text, "doc c");
    assert!(results[0].distance < results[1].distance);
}

#[tokio::test]
async fn empty_collections_short_circuit_without_embedding() {
    let dir = tempfile::tempdir().expect("tempdir");
    let embedder = Arc::new(MockEmbedder::new());
    let engine = MemoryEngine::open(
        config(dir.path(), false, 10),
        embedder.clone(),
        Arc::new(MockProvider::new()),
    )
    .await;

    assert!(engine.search_documents("anything", 3).await.expect("search").is_empty());
    assert!(engine
        .search_conversations("anything", 3)
        .await
        .expect("search")
        .is_empty());
    assert_eq!(embedder.call_count(), 0, "no embedding call for empty stores");
}

#[tokio::test]
async fn context_is_empty_when_both_collections_are_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = MemoryEngine::open(
        config(dir.path(), false, 10),
        Arc::new(MockEmbedder::new()),
        Arc::new(MockProvider::new()),
    )
    .await;

    let context = engine
        .get_context_for_query("anything", true, true)
        .await
        .expect("context");
    assert_eq!(context, "");
}

#[tokio::test]
async fn context_includes_only_populated_sections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = MemoryEngine::open(
        config(dir.path(), false, 10),
        Arc::new(MockEmbedder::new()),
        Arc::new(MockProvider::new()),
    )
    .await;

    engine
        .add_document("Rust ownership rules", None, None)
        .await
        .expect("add");

    let context = engine
        .get_context_for_query("ownership", true, true)
        .await
        .expect("context");
    assert!(context.contains("=== Relevant Knowledge ==="));
    assert!(context.contains("1. Rust ownership rules"));
    assert!(!context.contains("Relevant Past Conversations"));
}

#[tokio::test]
async fn context_respects_include_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = MemoryEngine::open(
        config(dir.path(), false, 10),
        Arc::new(MockEmbedder::new()),
        Arc::new(MockProvider::new()),
    )
    .await;

    engine.add_document("some knowledge", None, None).await.expect("add");
    engine
        .add_conversation("hi", "hello", &session(), None)
        .await
        .expect("add");

    let context = engine
        .get_context_for_query("hi", false, true)
        .await
        .expect("context");
    assert!(!context.contains("Relevant Knowledge"));
    assert!(context.contains("=== Relevant Past Conversations ==="));
}

#[tokio::test]
async fn rolling_window_compacts_oldest_turns_into_one_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let embedder = Arc::new(MockEmbedder::new());
    let provider = Arc::new(MockProvider::with_responses(vec![
        "the user asked five questions and got five answers".to_string(),
    ]));
    let engine = MemoryEngine::open(
        config(dir.path(), true, 10),
        embedder.clone(),
        provider.clone(),
    )
    .await;

    // The first ten turns never cross the threshold at policy-check time.
    add_turns(&engine, 10).await;
    assert_eq!(engine.count_conversations().await, 10);
    assert_eq!(provider.call_count(), 0);

    // The eleventh call folds the oldest five turns into one summary,
    // then inserts the new turn: 10 - 5 + 1 + 1 = 7.
    engine
        .add_conversation("question 10", "answer 10", &session(), None)
        .await
        .expect("add turn");
    assert_eq!(provider.call_count(), 1);
    assert_eq!(engine.count_conversations().await, 7);

    let summaries = engine
        .search_conversations("summary", 10)
        .await
        .expect("search")
        .into_iter()
        .filter(|r| r.metadata.get("isSummary") == Some(&MetadataValue::from(true)))
        .collect::<Vec<_>>();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert!(summary.text.starts_with("SUMMARY: "));
    assert_eq!(
        summary.metadata.get("type"),
        Some(&MetadataValue::from("summary"))
    );
    assert_eq!(
        summary.metadata.get("summarized_count"),
        Some(&MetadataValue::from(5i64))
    );
}

#[tokio::test]
async fn summary_inherits_metadata_of_triggering_turn() {
    let dir = tempfile::tempdir().expect("tempdir");
    let provider = Arc::new(MockProvider::with_responses(vec![
        "summary text".to_string(),
    ]));
    let engine = MemoryEngine::open(
        config(dir.path(), true, 4),
        Arc::new(MockEmbedder::new()),
        provider.clone(),
    )
    .await;

    add_turns(&engine, 4).await;

    // The fifth turn triggers compaction; its caller metadata lands on both
    // the new turn and the summary record.
    let mut extra = Metadata::new();
    extra.insert("topic".into(), MetadataValue::from("rust"));
    engine
        .add_conversation("question 4", "answer 4", &session(), Some(extra))
        .await
        .expect("add turn");
    assert_eq!(provider.call_count(), 1);

    let all = engine.search_conversations("anything", 20).await.expect("search");
    let summary = all
        .iter()
        .find(|r| r.metadata.get("type") == Some(&MetadataValue::from("summary")))
        .expect("one summary record");
    assert_eq!(summary.metadata.get("topic"), Some(&MetadataValue::from("rust")));
    assert_eq!(
        summary.metadata.get("isSummary"),
        Some(&MetadataValue::from(true))
    );
}

#[tokio::test]
async fn rolling_window_survives_summarization_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let provider = Arc::new(MockProvider::failing());
    let engine = MemoryEngine::open(
        config(dir.path(), true, 10),
        Arc::new(MockEmbedder::new()),
        provider.clone(),
    )
    .await;

    add_turns(&engine, 10).await;

    // Summarization fails; the turns stay and the new turn still lands.
    engine
        .add_conversation("question 10", "answer 10", &session(), None)
        .await
        .expect("add must succeed despite summarization failure");
    assert_eq!(provider.call_count(), 1);
    assert_eq!(engine.count_conversations().await, 11);

    let summaries = engine
        .search_conversations("anything", 20)
        .await
        .expect("search")
        .into_iter()
        .filter(|r| r.metadata.get("isSummary") == Some(&MetadataValue::from(true)))
        .count();
    assert_eq!(summaries, 0, "no summary record after failed compaction");
}

#[tokio::test]
async fn summaries_are_never_re_summarized() {
    let dir = tempfile::tempdir().expect("tempdir");
    let provider = Arc::new(MockProvider::with_responses(vec![
        "first summary".to_string(),
        "second summary".to_string(),
    ]));
    let engine = MemoryEngine::open(
        config(dir.path(), true, 4),
        Arc::new(MockEmbedder::new()),
        provider.clone(),
    )
    .await;

    // Threshold 4, batch 2. The fifth call compacts turns 0 and 1.
    add_turns(&engine, 5).await;
    assert_eq!(provider.call_count(), 1);
    assert_eq!(engine.count_conversations().await, 4);

    // Two more turns push non-summary count back to the threshold; the
    // next compaction must select turns only, leaving the first summary
    // in place.
    add_turns(&engine, 2).await;
    assert_eq!(provider.call_count(), 2);

    let all = engine.search_conversations("anything", 20).await.expect("search");
    let summaries: Vec<_> = all
        .iter()
        .filter(|r| r.metadata.get("type") == Some(&MetadataValue::from("summary")))
        .collect();
    assert_eq!(summaries.len(), 2);
    assert!(summaries
        .iter()
        .any(|s| s.text == "SUMMARY: first summary"));
    assert!(summaries
        .iter()
        .any(|s| s.text == "SUMMARY: second summary"));
}

#[tokio::test]
async fn rolling_window_disabled_never_calls_provider() {
    let dir = tempfile::tempdir().expect("tempdir");
    let provider = Arc::new(MockProvider::new());
    let engine = MemoryEngine::open(
        config(dir.path(), false, 10),
        Arc::new(MockEmbedder::new()),
        provider.clone(),
    )
    .await;

    add_turns(&engine, 15).await;
    assert_eq!(provider.call_count(), 0);
    assert_eq!(engine.count_conversations().await, 15);
}
