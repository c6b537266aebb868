// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The memory engine: two vector collections (documents and conversations)
//! coordinated with embedding and text-generation providers.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use cairn_config::MemoryConfig;
use cairn_core::traits::{EmbeddingAdapter, ProviderAdapter};
use cairn_core::types::{EmbeddingInput, SessionId};
use cairn_core::CairnError;
use cairn_vector::{Metadata, MetadataFilter, MetadataValue, Record, StoredRecord, VectorCollection};

use crate::compaction;
use crate::types::SearchResult;

/// File name of the knowledge-base collection under the persist dir.
const DOCUMENTS_FILE: &str = "documents.json";
/// File name of the conversation-history collection under the persist dir.
const CONVERSATIONS_FILE: &str = "conversations.json";

/// Coordinates the document and conversation collections with external
/// embedding and text-generation providers.
///
/// Construct one engine per persist directory and share it by handle; each
/// collection sits behind a mutex, so mutations through one engine are
/// serialized per collection. Nothing guards the backing files against a
/// second process writing them concurrently — that remains undefined.
pub struct MemoryEngine {
    documents: Mutex<VectorCollection>,
    conversations: Mutex<VectorCollection>,
    embedder: Arc<dyn EmbeddingAdapter>,
    provider: Arc<dyn ProviderAdapter>,
    config: MemoryConfig,
}

impl MemoryEngine {
    /// Opens the engine, loading both collections from the configured
    /// persist directory. Missing or corrupt collection files start empty.
    pub async fn open(
        config: MemoryConfig,
        embedder: Arc<dyn EmbeddingAdapter>,
        provider: Arc<dyn ProviderAdapter>,
    ) -> Self {
        let documents = VectorCollection::open(config.persist_dir.join(DOCUMENTS_FILE)).await;
        let conversations =
            VectorCollection::open(config.persist_dir.join(CONVERSATIONS_FILE)).await;

        tracing::info!(
            persist_dir = %config.persist_dir.display(),
            documents = documents.count(),
            conversations = conversations.count(),
            "memory engine opened"
        );

        Self {
            documents: Mutex::new(documents),
            conversations: Mutex::new(conversations),
            embedder,
            provider,
            config,
        }
    }

    /// Embeds a single text, failing on provider errors or empty output.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, CairnError> {
        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?;
        output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| CairnError::Internal("embedding returned no vectors".to_string()))
    }

    /// Adds a document to the knowledge base and returns its id.
    ///
    /// The id is caller-supplied or a fresh UUID; uniqueness is assumed,
    /// not verified. Embedding failures propagate.
    pub async fn add_document(
        &self,
        text: &str,
        metadata: Option<Metadata>,
        id: Option<String>,
    ) -> Result<String, CairnError> {
        let embedding = self.embed_one(text).await?;
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut documents = self.documents.lock().await;
        documents
            .add(vec![Record {
                id: id.clone(),
                embedding,
                content: text.to_string(),
                metadata,
            }])
            .await?;

        tracing::debug!(id = %id, "document added to knowledge base");
        Ok(id)
    }

    /// Records a conversation turn and returns its id.
    ///
    /// The turn is stored as `"User: {user}\nAssistant: {assistant}"`. When
    /// rolling-window compaction is enabled, the policy runs before the new
    /// turn is inserted, so the fresh turn is never part of the batch it
    /// triggers. Caller metadata overrides the engine-set keys on conflict.
    pub async fn add_conversation(
        &self,
        user_message: &str,
        ai_message: &str,
        session_id: &SessionId,
        metadata: Option<Metadata>,
    ) -> Result<String, CairnError> {
        let combined = format!("User: {user_message}\nAssistant: {ai_message}");
        let embedding = self.embed_one(&combined).await?;

        let mut conversations = self.conversations.lock().await;

        if self.config.rolling_window {
            self.maybe_compact(&mut conversations, session_id, metadata.as_ref())
                .await?;
        }

        let mut meta = Metadata::new();
        meta.insert("session_id".into(), MetadataValue::from(session_id.0.clone()));
        meta.insert("type".into(), MetadataValue::from("conversation"));
        meta.insert("user_message".into(), MetadataValue::from(user_message));
        meta.insert("ai_message".into(), MetadataValue::from(ai_message));
        meta.insert("isSummary".into(), MetadataValue::from(false));
        if let Some(extra) = metadata {
            meta.extend(extra);
        }

        let id = Uuid::new_v4().to_string();
        conversations
            .add(vec![Record {
                id: id.clone(),
                embedding,
                content: combined,
                metadata: Some(meta),
            }])
            .await?;

        Ok(id)
    }

    /// Runs the rolling-window policy against the conversation collection.
    ///
    /// When at least `rolling_window_threshold` non-summary turns exist,
    /// the oldest `threshold / 2` are folded into one summary record. The
    /// triggering call's metadata is carried onto the summary, same as on
    /// the turn itself. A summarization failure abandons compaction without
    /// touching the selected turns; storage and embedding failures
    /// propagate.
    async fn maybe_compact(
        &self,
        conversations: &mut VectorCollection,
        session_id: &SessionId,
        caller_metadata: Option<&Metadata>,
    ) -> Result<(), CairnError> {
        let not_summary = MetadataFilter::new().not_equals("type", "summary");
        let turns = conversations.get(Some(&not_summary));
        if turns.len() < self.config.rolling_window_threshold {
            return Ok(());
        }

        let batch = (self.config.rolling_window_threshold / 2).min(turns.len());
        let selected = &turns[..batch];
        tracing::info!(
            stored_turns = turns.len(),
            batch,
            "rolling window triggered"
        );

        let contents: Vec<&str> = selected.iter().map(|r| r.content.as_str()).collect();
        let summary = match compaction::generate_summary(
            self.provider.as_ref(),
            &contents,
            &self.config.summary_model,
            self.config.summary_max_tokens,
        )
        .await
        {
            Ok((summary, _usage)) => summary,
            Err(e) => {
                tracing::warn!(error = %e, "rolling window summarization failed, keeping turns");
                return Ok(());
            }
        };

        let selected_ids: Vec<String> = selected.iter().map(|r| r.id.clone()).collect();
        conversations.delete(&selected_ids).await?;

        let summary_embedding = self.embed_one(&summary).await?;
        let summary_id = Uuid::new_v4().to_string();

        let mut meta = Metadata::new();
        meta.insert("session_id".into(), MetadataValue::from(session_id.0.clone()));
        meta.insert("type".into(), MetadataValue::from("summary"));
        meta.insert("isSummary".into(), MetadataValue::from(true));
        meta.insert("summarized_count".into(), MetadataValue::from(batch as i64));
        meta.insert(
            "timestamp".into(),
            MetadataValue::from(chrono::Utc::now().to_rfc3339()),
        );
        if let Some(extra) = caller_metadata {
            meta.extend(extra.clone());
        }

        conversations
            .add(vec![Record {
                id: summary_id.clone(),
                embedding: summary_embedding,
                content: format!("SUMMARY: {summary}"),
                metadata: Some(meta),
            }])
            .await?;

        tracing::info!(
            summary_id = %summary_id,
            summarized = batch,
            "compacted old turns into summary"
        );
        Ok(())
    }

    /// Searches the knowledge base, best match first.
    ///
    /// An empty collection short-circuits to an empty result without
    /// calling the embedding provider.
    pub async fn search_documents(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>, CairnError> {
        if self.documents.lock().await.count() == 0 {
            return Ok(Vec::new());
        }
        let embedding = self.embed_one(query).await?;
        let documents = self.documents.lock().await;
        Ok(to_search_results(documents.query(&embedding, k)))
    }

    /// Searches past conversations (turns and summaries), best match first.
    ///
    /// Same empty-collection short-circuit as [`search_documents`].
    ///
    /// [`search_documents`]: MemoryEngine::search_documents
    pub async fn search_conversations(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>, CairnError> {
        if self.conversations.lock().await.count() == 0 {
            return Ok(Vec::new());
        }
        let embedding = self.embed_one(query).await?;
        let conversations = self.conversations.lock().await;
        Ok(to_search_results(conversations.query(&embedding, k)))
    }

    /// Assembles a context blob for a query: a labeled knowledge section
    /// followed by a labeled past-conversations section, each capped by the
    /// configured result counts. Returns an empty string when neither
    /// section produced results.
    pub async fn get_context_for_query(
        &self,
        query: &str,
        include_docs: bool,
        include_convs: bool,
    ) -> Result<String, CairnError> {
        let mut parts: Vec<String> = Vec::new();

        if include_docs {
            let results = self
                .search_documents(query, self.config.context_doc_results)
                .await?;
            if !results.is_empty() {
                parts.push("=== Relevant Knowledge ===".to_string());
                for (i, result) in results.iter().enumerate() {
                    parts.push(format!("{}. {}", i + 1, result.text));
                }
            }
        }

        if include_convs {
            let results = self
                .search_conversations(query, self.config.context_conv_results)
                .await?;
            if !results.is_empty() {
                parts.push("\n=== Relevant Past Conversations ===".to_string());
                for (i, result) in results.iter().enumerate() {
                    parts.push(format!("{}. {}", i + 1, result.text));
                }
            }
        }

        Ok(parts.join("\n"))
    }

    /// Lists every document in the knowledge base, insertion order.
    pub async fn list_knowledge(&self) -> Vec<StoredRecord> {
        self.documents.lock().await.get(None)
    }

    /// Deletes documents from the knowledge base. Unknown ids are ignored.
    pub async fn delete_knowledge(&self, ids: &[String]) -> Result<(), CairnError> {
        self.documents.lock().await.delete(ids).await
    }

    /// Resets both collections to empty, rewriting their backing files.
    pub async fn clear_all_data(&self) -> Result<(), CairnError> {
        self.documents.lock().await.clear().await?;
        self.conversations.lock().await.clear().await?;
        tracing::info!("all memory collections cleared");
        Ok(())
    }

    /// Number of stored documents.
    pub async fn count_documents(&self) -> usize {
        self.documents.lock().await.count()
    }

    /// Number of stored conversation records, summaries included.
    pub async fn count_conversations(&self) -> usize {
        self.conversations.lock().await.count()
    }
}

fn to_search_results(matches: Vec<cairn_vector::QueryMatch>) -> Vec<SearchResult> {
    matches
        .into_iter()
        .map(|m| SearchResult {
            text: m.content,
            metadata: m.metadata,
            distance: m.distance,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_test_utils::{MockEmbedder, MockProvider};

    fn test_config(dir: &std::path::Path, rolling_window: bool) -> MemoryConfig {
        MemoryConfig {
            persist_dir: dir.to_path_buf(),
            rolling_window,
            ..MemoryConfig::default()
        }
    }

    async fn test_engine(dir: &std::path::Path) -> MemoryEngine {
        MemoryEngine::open(
            test_config(dir, false),
            Arc::new(MockEmbedder::new()),
            Arc::new(MockProvider::new()),
        )
        .await
    }

    #[tokio::test]
    async fn add_document_returns_generated_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = test_engine(dir.path()).await;

        let id = engine
            .add_document("Rust is a systems language", None, None)
            .await
            .expect("add");
        assert!(!id.is_empty());
        assert_eq!(engine.count_documents().await, 1);
    }

    #[tokio::test]
    async fn add_document_accepts_caller_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = test_engine(dir.path()).await;

        let id = engine
            .add_document("doc", None, Some("doc-1".to_string()))
            .await
            .expect("add");
        assert_eq!(id, "doc-1");
        assert_eq!(engine.list_knowledge().await[0].id, "doc-1");
    }

    #[tokio::test]
    async fn add_conversation_tags_turn_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = test_engine(dir.path()).await;

        engine
            .add_conversation("hello", "hi there", &SessionId("s1".into()), None)
            .await
            .expect("add");

        let results = engine.search_conversations("hello", 1).await.expect("search");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "User: hello\nAssistant: hi there");
        assert_eq!(
            results[0].metadata.get("type"),
            Some(&MetadataValue::from("conversation"))
        );
        assert_eq!(
            results[0].metadata.get("isSummary"),
            Some(&MetadataValue::from(false))
        );
        assert_eq!(
            results[0].metadata.get("session_id"),
            Some(&MetadataValue::from("s1"))
        );
        assert_eq!(
            results[0].metadata.get("user_message"),
            Some(&MetadataValue::from("hello"))
        );
    }

    #[tokio::test]
    async fn embedding_failure_propagates_from_add() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = MemoryEngine::open(
            test_config(dir.path(), false),
            Arc::new(MockEmbedder::failing()),
            Arc::new(MockProvider::new()),
        )
        .await;

        let err = engine
            .add_document("doc", None, None)
            .await
            .expect_err("embedding failure should propagate");
        assert!(matches!(err, CairnError::Embedding { .. }));
        assert_eq!(engine.count_documents().await, 0);
    }

    #[tokio::test]
    async fn delete_knowledge_removes_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = test_engine(dir.path()).await;

        let id = engine.add_document("doc", None, None).await.expect("add");
        engine.delete_knowledge(&[id]).await.expect("delete");
        assert!(engine.list_knowledge().await.is_empty());
    }

    #[tokio::test]
    async fn clear_all_data_empties_both_collections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = test_engine(dir.path()).await;

        engine.add_document("doc", None, None).await.expect("add doc");
        engine
            .add_conversation("u", "a", &SessionId("s".into()), None)
            .await
            .expect("add conv");

        engine.clear_all_data().await.expect("clear");
        assert_eq!(engine.count_documents().await, 0);
        assert_eq!(engine.count_conversations().await, 0);
    }
}
