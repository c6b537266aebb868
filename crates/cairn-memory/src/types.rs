// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result types returned by the memory engine.

use cairn_vector::Metadata;

/// A single retrieval result, ordered best-first by the engine.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Stored free-text content.
    pub text: String,
    /// Metadata the record was stored with.
    pub metadata: Metadata,
    /// `1 - cosine_similarity` against the query. Lower is closer.
    pub distance: f32,
}
