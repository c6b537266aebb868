// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait implemented by all provider plugins.

use async_trait::async_trait;

use crate::error::CairnError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Cairn plugin adapters.
///
/// Every adapter (embedding, provider) must implement this trait, which
/// provides identity and health check capabilities.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter (provider, embedding, storage).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, CairnError>;
}
