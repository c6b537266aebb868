// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Cairn workspace.
//!
//! Provides mock implementations of the embedding and text-generation
//! adapter traits so engine behavior can be tested deterministically and
//! without network access.

pub mod mock_embedder;
pub mod mock_provider;

pub use mock_embedder::MockEmbedder;
pub use mock_provider::MockProvider;
