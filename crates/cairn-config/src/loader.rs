// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./cairn.toml` > `~/.config/cairn/cairn.toml` >
//! `/etc/cairn/cairn.toml` with environment variable overrides via the
//! `CAIRN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CairnConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cairn/cairn.toml` (system-wide)
/// 3. `~/.config/cairn/cairn.toml` (user XDG config)
/// 4. `./cairn.toml` (local directory)
/// 5. `CAIRN_*` environment variables
pub fn load_config() -> Result<CairnConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CairnConfig::default()))
        .merge(Toml::file("/etc/cairn/cairn.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cairn/cairn.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cairn.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CairnConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CairnConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CairnConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CairnConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `CAIRN_OPENROUTER_API_KEY`
/// must map to `openrouter.api_key`, not `openrouter.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CAIRN_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CAIRN_MEMORY_ROLLING_WINDOW -> "memory_rolling_window"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("memory_", "memory.", 1)
            .replacen("openrouter_", "openrouter.", 1);
        mapped.into()
    })
}
