// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval memory engine for the Cairn chat assistant.
//!
//! Organizes two persisted vector collections — standalone knowledge
//! documents and running conversation turns — and coordinates them with
//! external embedding and text-generation providers:
//!
//! - **MemoryEngine**: knowledge-base management, semantic search, and
//!   context assembly for a query
//! - **Rolling-window compaction**: once conversation history crosses a
//!   count threshold, the oldest turns are folded into a single summary
//!   record, keeping storage bounded
//!
//! The engine is constructed explicitly and passed by handle; there is no
//! process-wide singleton.

pub mod compaction;
pub mod engine;
pub mod types;

pub use engine::MemoryEngine;
pub use types::SearchResult;
