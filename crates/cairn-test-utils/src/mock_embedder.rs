// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter for deterministic testing.
//!
//! `MockEmbedder` implements `EmbeddingAdapter` without any network calls.
//! Texts can be mapped to fixed vectors; unmapped texts get a deterministic
//! hash-derived vector. A call counter lets tests assert that an operation
//! short-circuited without embedding anything.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use cairn_core::traits::adapter::PluginAdapter;
use cairn_core::traits::embedding::EmbeddingAdapter;
use cairn_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use cairn_core::CairnError;

/// Dimensionality of hash-derived mock vectors.
const MOCK_DIM: usize = 8;

/// A mock embedder returning deterministic vectors.
pub struct MockEmbedder {
    fixed: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
    fail: bool,
}

impl MockEmbedder {
    /// Create a mock embedder that hashes every text into a vector.
    pub fn new() -> Self {
        Self {
            fixed: HashMap::new(),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Create a mock embedder with fixed vectors for specific texts.
    /// Texts not in the map fall back to the hash-derived vector.
    pub fn with_vectors(fixed: HashMap<String, Vec<f32>>) -> Self {
        Self {
            fixed,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Create a mock embedder whose `embed` always fails.
    pub fn failing() -> Self {
        Self {
            fixed: HashMap::new(),
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(v) = self.fixed.get(text) {
            return v.clone();
        }
        // Deterministic pseudo-embedding: hash the text with per-dimension
        // salts and normalize to the unit sphere.
        let mut v: Vec<f32> = (0..MOCK_DIM)
            .map(|dim| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                dim.hash(&mut hasher);
                (hasher.finish() % 1000) as f32 / 1000.0 - 0.5
            })
            .collect();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, CairnError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, CairnError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CairnError::Embedding {
                message: "mock embedder configured to fail".to_string(),
                source: None,
            });
        }
        let embeddings: Vec<Vec<f32>> = input.texts.iter().map(|t| self.vector_for(t)).collect();
        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        Ok(EmbeddingOutput {
            embeddings,
            dimensions,
        })
    }
}
