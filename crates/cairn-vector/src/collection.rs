// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed vector collection with linear-scan cosine similarity search.
//!
//! Each collection mirrors its full state to a single JSON file holding four
//! parallel, index-aligned arrays (ids, embeddings, documents, metadatas).
//! Every mutating operation rewrites the whole file before returning, so a
//! reload always reproduces the in-memory state.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cairn_core::CairnError;

use crate::filter::MetadataFilter;
use crate::types::{cosine_similarity, Metadata, QueryMatch, Record, StoredRecord};

/// Helper to convert I/O and serialization errors into CairnError::Storage.
fn storage_err(e: impl std::error::Error + Send + Sync + 'static) -> CairnError {
    CairnError::Storage { source: Box::new(e) }
}

/// On-disk representation: four parallel arrays in insertion order.
///
/// Invariant: all four vectors always have equal length.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionData {
    ids: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    documents: Vec<String>,
    metadatas: Vec<Metadata>,
}

/// Durable, queryable store of records for one logical namespace.
///
/// Assumes a single logical writer per backing file: concurrent mutations
/// from separate handles race on the whole-file read-modify-write cycle and
/// can lose updates. Hold one collection handle per file.
pub struct VectorCollection {
    path: PathBuf,
    data: CollectionData,
}

impl VectorCollection {
    /// Opens the collection at `path`, loading existing state if present.
    ///
    /// A missing, unreadable, or unparseable file initializes an empty
    /// collection instead of failing; the store self-heals after corruption
    /// at the cost of losing the corrupt contents. Nothing is written until
    /// the first mutation.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = Self::load(&path).await;
        Self { path, data }
    }

    /// Reads collection state from disk, resetting to empty on any failure.
    async fn load(path: &Path) -> CollectionData {
        match tokio::fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice::<CollectionData>(&bytes) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "collection file unparseable, starting empty"
                    );
                    CollectionData::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no collection file, starting empty");
                CollectionData::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "collection file unreadable, starting empty"
                );
                CollectionData::default()
            }
        }
    }

    /// Serializes the full in-memory state to the backing file, creating
    /// parent directories as needed. Write failures propagate.
    async fn save(&self) -> Result<(), CairnError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
        }
        let json = serde_json::to_vec_pretty(&self.data).map_err(storage_err)?;
        tokio::fs::write(&self.path, json).await.map_err(storage_err)
    }

    /// Appends records in order and persists.
    ///
    /// No uniqueness check is performed; callers are responsible for
    /// supplying distinct ids. If the save fails the appended records are
    /// already in memory, so a retried call would append them again.
    pub async fn add(&mut self, records: Vec<Record>) -> Result<(), CairnError> {
        for record in records {
            self.data.ids.push(record.id);
            self.data.embeddings.push(record.embedding);
            self.data.documents.push(record.content);
            self.data.metadatas.push(record.metadata.unwrap_or_default());
        }
        self.save().await
    }

    /// Returns the top `k` records by descending cosine similarity to
    /// `query_embedding`.
    ///
    /// Linear scan, O(n*d). The sort is stable, so exact similarity ties
    /// keep insertion order. A NaN similarity (zero-norm vector on either
    /// side) ranks below every real score. An empty collection yields an
    /// empty result, not an error.
    pub fn query(&self, query_embedding: &[f32], k: usize) -> Vec<QueryMatch> {
        let mut scored: Vec<(usize, f32)> = self
            .data
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, embedding)| (i, cosine_similarity(query_embedding, embedding)))
            .collect();

        // NaN sorts as negative infinity so zero-norm vectors never outrank
        // real matches.
        let sort_key = |s: f32| if s.is_nan() { f32::NEG_INFINITY } else { s };
        scored.sort_by(|a, b| sort_key(b.1).total_cmp(&sort_key(a.1)));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, similarity)| QueryMatch {
                id: self.data.ids[i].clone(),
                content: self.data.documents[i].clone(),
                metadata: self.data.metadatas[i].clone(),
                distance: 1.0 - similarity,
            })
            .collect()
    }

    /// Returns all records in insertion order, or only those satisfying
    /// every condition of `filter` when one is supplied.
    pub fn get(&self, filter: Option<&MetadataFilter>) -> Vec<StoredRecord> {
        self.data
            .ids
            .iter()
            .enumerate()
            .filter(|(i, _)| match filter {
                Some(f) => f.matches(&self.data.metadatas[*i]),
                None => true,
            })
            .map(|(i, id)| StoredRecord {
                id: id.clone(),
                content: self.data.documents[i].clone(),
                metadata: self.data.metadatas[i].clone(),
            })
            .collect()
    }

    /// Removes every record whose id appears in `ids` and persists.
    /// Unknown ids are silently ignored.
    pub async fn delete(&mut self, ids: &[String]) -> Result<(), CairnError> {
        let remove: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let keep: Vec<bool> = self
            .data
            .ids
            .iter()
            .map(|id| !remove.contains(id.as_str()))
            .collect();

        let mut keep_ids = keep.iter().copied();
        self.data.ids.retain(|_| keep_ids.next().unwrap_or(true));
        let mut keep_emb = keep.iter().copied();
        self.data.embeddings.retain(|_| keep_emb.next().unwrap_or(true));
        let mut keep_doc = keep.iter().copied();
        self.data.documents.retain(|_| keep_doc.next().unwrap_or(true));
        let mut keep_meta = keep.iter().copied();
        self.data.metadatas.retain(|_| keep_meta.next().unwrap_or(true));
        self.save().await
    }

    /// Number of stored records.
    pub fn count(&self) -> usize {
        self.data.ids.len()
    }

    /// Resets the collection to empty and rewrites the backing file.
    pub async fn clear(&mut self) -> Result<(), CairnError> {
        self.data = CollectionData::default();
        self.save().await
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
