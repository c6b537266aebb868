// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cairn memory engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Cairn workspace. The memory engine
//! depends only on the trait seams defined here, so embedding and
//! text-generation providers remain substitutable.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CairnError;
pub use types::{AdapterType, HealthStatus, SessionId, TokenUsage};

// Re-export the adapter traits at crate root.
pub use traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter};
