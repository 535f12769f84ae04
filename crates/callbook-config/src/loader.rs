// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./callbook.toml` > `~/.config/callbook/callbook.toml` > `/etc/callbook/callbook.toml`
//! with environment variable overrides via `CALLBOOK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CallbookConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/callbook/callbook.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "callbook.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/callbook/callbook.toml` (system-wide)
/// 3. `~/.config/callbook/callbook.toml` (user XDG config)
/// 4. `./callbook.toml` (local directory)
/// 5. `CALLBOOK_*` environment variables
pub fn load_config() -> Result<CallbookConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CallbookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CallbookConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CallbookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CallbookConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CallbookConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/callbook/callbook.toml`, when a config dir exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("callbook").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `CALLBOOK_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("CALLBOOK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key = key.as_str();
        match key.split_once('_') {
            Some((section, rest)) if SECTIONS.contains(&section) => {
                format!("{section}.{rest}").into()
            }
            _ => key.to_string().into(),
        }
    })
}

/// Top-level sections that environment variables may address.
const SECTIONS: &[&str] = &["app", "storage", "contacts", "calendar", "gateway"];
