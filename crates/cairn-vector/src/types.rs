// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record and metadata types for vector collections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A scalar metadata value.
///
/// Serialized untagged so collection files carry plain JSON scalars.
/// Variant order matters for deserialization: booleans and integers are
/// tried before floats so `true` and `5` keep their types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Str(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Str(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

/// Free-form metadata attached to a record.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A record to be added to a collection.
#[derive(Debug, Clone)]
pub struct Record {
    /// Unique identifier within the collection. Immutable once stored.
    pub id: String,
    /// Embedding vector. Length must match the collection's established
    /// dimensionality; this layer does not validate it.
    pub embedding: Vec<f32>,
    /// Free-text content.
    pub content: String,
    /// Metadata mapping. `None` defaults to an empty map.
    pub metadata: Option<Metadata>,
}

/// A stored record as returned by [`get`](crate::VectorCollection::get),
/// without its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub content: String,
    pub metadata: Metadata,
}

/// A nearest-neighbor match returned by
/// [`query`](crate::VectorCollection::query).
#[derive(Debug, Clone)]
pub struct QueryMatch {
    pub id: String,
    pub content: String,
    pub metadata: Metadata,
    /// `1 - cosine_similarity`. Lower is closer. NaN when either vector
    /// has zero norm.
    pub distance: f32,
}

/// Compute cosine similarity between two vectors: `dot(a,b) / (|a|*|b|)`.
///
/// Returns NaN when either norm is zero; callers treat NaN as "no match".
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
