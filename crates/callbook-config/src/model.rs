// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Callbook.
//!
//! Unknown keys are rejected (`deny_unknown_fields`) so a typo in
//! `callbook.toml` fails at startup instead of being ignored.

use callbook_core::{LoadThresholds, ValidationRules};
use serde::{Deserialize, Serialize};

/// Top-level Callbook configuration.
///
/// Every section may be omitted; missing values fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallbookConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Contact validation and write-path settings.
    #[serde(default)]
    pub contacts: ContactsConfig,

    /// Calendar aggregation settings.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in logs and health responses.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "callbook".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// How long SQLite waits on a locked database before giving up.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("callbook").join("callbook.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("callbook.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Contact validation and write-path configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContactsConfig {
    /// Minimum characters in a contact name.
    #[serde(default = "default_min_name_chars")]
    pub min_name_chars: usize,

    /// Minimum digits in a phone number.
    #[serde(default = "default_min_phone_digits")]
    pub min_phone_digits: usize,

    /// Serialize same-name submissions within this process.
    #[serde(default = "default_serialize_writes")]
    pub serialize_writes: bool,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            min_name_chars: default_min_name_chars(),
            min_phone_digits: default_min_phone_digits(),
            serialize_writes: default_serialize_writes(),
        }
    }
}

impl ContactsConfig {
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            min_name_chars: self.min_name_chars,
            min_phone_digits: self.min_phone_digits,
        }
    }
}

fn default_min_name_chars() -> usize {
    callbook_core::validation::MIN_NAME_CHARS
}

fn default_min_phone_digits() -> usize {
    10
}

fn default_serialize_writes() -> bool {
    true
}

/// Calendar aggregation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    /// Days after the anchor covered by a default calendar request.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Largest window a caller may request.
    #[serde(default = "default_max_window_days")]
    pub max_window_days: u32,

    /// Calls per day above which a day is shown as busy.
    #[serde(default = "default_busy_threshold")]
    pub busy_threshold: u32,

    /// Calls per day above which a day is shown as overloaded.
    #[serde(default = "default_overloaded_threshold")]
    pub overloaded_threshold: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            max_window_days: default_max_window_days(),
            busy_threshold: default_busy_threshold(),
            overloaded_threshold: default_overloaded_threshold(),
        }
    }
}

impl CalendarConfig {
    pub fn thresholds(&self) -> LoadThresholds {
        LoadThresholds {
            busy: self.busy_threshold,
            overloaded: self.overloaded_threshold,
        }
    }
}

fn default_window_days() -> u32 {
    30
}

fn default_max_window_days() -> u32 {
    366
}

fn default_busy_threshold() -> u32 {
    10
}

fn default_overloaded_threshold() -> u32 {
    20
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deadline applied to each request's store work.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    10
}
