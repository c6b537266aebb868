// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded vector collection for the Cairn memory engine.
//!
//! Provides a small, file-backed store of records (id, embedding, content,
//! metadata) with linear-scan k-nearest-neighbor search over cosine
//! similarity. Designed for single-process, single-writer, small-to-medium
//! corpora; there is no approximate index and no cross-process locking.
//!
//! ## Durability model
//!
//! Writes are strict: every mutation rewrites the whole backing file and
//! save failures propagate. Reads are lenient: a missing or corrupt file
//! silently resets to an empty collection. The asymmetry makes the store
//! self-healing after corruption at the cost of silent data loss.

pub mod collection;
pub mod filter;
pub mod types;

pub use collection::VectorCollection;
pub use filter::{FilterCondition, MetadataFilter};
pub use types::{cosine_similarity, Metadata, MetadataValue, QueryMatch, Record, StoredRecord};
