// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cairn memory engine.

use thiserror::Error;

/// The primary error type used across Cairn adapter traits and engine operations.
///
/// Two failure classes deliberately have no variant here:
/// - a corrupt or missing collection file is recovered locally by resetting
///   the collection to empty and is never surfaced;
/// - deleting an unknown id or querying an empty collection is a no-op /
///   empty result, not an error.
#[derive(Debug, Error)]
pub enum CairnError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Collection file could not be written or serialized.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Text-generation provider errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Embedding provider errors (network, auth, rate limiting).
    #[error("embedding error: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
