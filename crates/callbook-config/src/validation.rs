// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints that serde attributes cannot express, such as
//! non-empty paths, a usable bind address, and ordered thresholds.

use callbook_core::validation::MIN_NAME_CHARS;

use crate::diagnostic::ConfigError;
use crate::model::CallbookConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or every collected error
/// (does not fail fast).
pub fn validate_config(config: &CallbookConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "app.log_level `{}` must be one of {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.contacts.min_name_chars < MIN_NAME_CHARS {
        fail(format!(
            "contacts.min_name_chars ({}) must be at least {MIN_NAME_CHARS}",
            config.contacts.min_name_chars
        ));
    }

    let calendar = &config.calendar;
    if calendar.max_window_days == 0 {
        fail("calendar.max_window_days must be at least 1".to_string());
    }
    if calendar.window_days > calendar.max_window_days {
        fail(format!(
            "calendar.window_days ({}) must not exceed calendar.max_window_days ({})",
            calendar.window_days, calendar.max_window_days
        ));
    }
    if calendar.busy_threshold >= calendar.overloaded_threshold {
        fail(format!(
            "calendar.busy_threshold ({}) must be below calendar.overloaded_threshold ({})",
            calendar.busy_threshold, calendar.overloaded_threshold
        ));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.gateway.request_timeout_secs == 0 {
        fail("gateway.request_timeout_secs must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &CallbookConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CallbookConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = CallbookConfig::default();
        config.storage.database_path = "  ".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("database_path")));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = CallbookConfig::default();
        config.app.log_level = "verbose".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("log_level")));
    }

    #[test]
    fn window_larger_than_maximum_fails() {
        let mut config = CallbookConfig::default();
        config.calendar.window_days = 400;
        assert!(messages(&config).iter().any(|m| m.contains("window_days")));
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let mut config = CallbookConfig::default();
        config.calendar.busy_threshold = 20;
        config.calendar.overloaded_threshold = 20;
        assert!(messages(&config).iter().any(|m| m.contains("busy_threshold")));
    }

    #[test]
    fn bad_host_fails() {
        let mut config = CallbookConfig::default();
        config.gateway.host = "local host!".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("gateway.host")));
    }

    #[test]
    fn name_minimum_cannot_drop_below_two() {
        let mut config = CallbookConfig::default();
        config.contacts.min_name_chars = 1;
        assert!(messages(&config).iter().any(|m| m.contains("contacts.min_name_chars")));
        config.contacts.min_name_chars = 2;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = CallbookConfig::default();
        config.storage.database_path = String::new();
        config.contacts.min_name_chars = 0;
        config.gateway.request_timeout_secs = 0;
        assert_eq!(messages(&config).len(), 3);
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = CallbookConfig::default();
        config.gateway.host = "0.0.0.0".to_string();
        config.storage.database_path = "/tmp/callbook.db".to_string();
        config.calendar.window_days = 60;
        config.app.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
