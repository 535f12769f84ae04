// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Callbook configuration system.

use callbook_config::diagnostic::ConfigError;
use callbook_config::model::CallbookConfig;
use callbook_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_callbook_config() {
    let toml = r#"
[app]
name = "sales-desk"
log_level = "debug"

[storage]
database_path = "/tmp/contacts.db"
wal_mode = false
busy_timeout_ms = 250

[contacts]
min_name_chars = 3
min_phone_digits = 8
serialize_writes = false

[calendar]
window_days = 14
max_window_days = 90
busy_threshold = 5
overloaded_threshold = 12

[gateway]
host = "0.0.0.0"
port = 8080
request_timeout_secs = 3
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "sales-desk");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/contacts.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 250);
    assert_eq!(config.contacts.min_name_chars, 3);
    assert_eq!(config.contacts.min_phone_digits, 8);
    assert!(!config.contacts.serialize_writes);
    assert_eq!(config.calendar.window_days, 14);
    assert_eq!(config.calendar.max_window_days, 90);
    assert_eq!(config.calendar.busy_threshold, 5);
    assert_eq!(config.calendar.overloaded_threshold, 12);
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.request_timeout_secs, 3);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.name, "callbook");
    assert_eq!(config.app.log_level, "info");
    assert!(config.storage.database_path.ends_with("callbook.db"));
    assert!(config.storage.wal_mode);
    assert_eq!(config.contacts.min_name_chars, 2);
    assert_eq!(config.contacts.min_phone_digits, 10);
    assert!(config.contacts.serialize_writes);
    assert_eq!(config.calendar.window_days, 30);
    assert_eq!(config.calendar.busy_threshold, 10);
    assert_eq!(config.calendar.overloaded_threshold, 20);
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 3000);
}

/// Unknown field in [contacts] produces an error mentioning the bad key.
#[test]
fn unknown_field_in_contacts_produces_error() {
    let toml = r#"
[contacts]
min_phone_digit = 7
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("min_phone_digit"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// The validated loader reports unknown keys as diagnostics with suggestions.
#[test]
fn load_and_validate_str_suggests_typo_fix() {
    let errors = load_and_validate_str("[calendar]\nwindow_dayz = 7\n").unwrap_err();
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "window_days"
    )));
}

/// A one-character name minimum would let `"A"` through, so it is refused.
#[test]
fn one_char_name_minimum_is_rejected() {
    let errors = load_and_validate_str("[contacts]\nmin_name_chars = 1\n").unwrap_err();
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("min_name_chars"))
    ));
    assert!(load_and_validate_str("[contacts]\nmin_name_chars = 2\n").is_ok());
}

/// The validated loader also runs semantic validation.
#[test]
fn load_and_validate_str_runs_semantic_checks() {
    let errors = load_and_validate_str("[calendar]\nwindow_days = 500\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(
                e,
                ConfigError::Validation { message } if message.contains("max_window_days")
            ))
    );
}

/// CALLBOOK_* environment variables override file values, including keys with underscores.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "callbook.toml",
            r#"
[storage]
database_path = "from-file.db"

[gateway]
port = 4000
"#,
        )?;
        jail.set_env("CALLBOOK_STORAGE_DATABASE_PATH", "from-env.db");
        jail.set_env("CALLBOOK_CALENDAR_WINDOW_DAYS", "7");
        jail.set_env("CALLBOOK_GATEWAY_REQUEST_TIMEOUT_SECS", "2");

        let config = load_config_from_path(std::path::Path::new("callbook.toml"))?;
        assert_eq!(config.storage.database_path, "from-env.db");
        assert_eq!(config.calendar.window_days, 7);
        assert_eq!(config.gateway.request_timeout_secs, 2);
        assert_eq!(config.gateway.port, 4000);
        Ok(())
    });
}

/// The full XDG loader picks up `./callbook.toml` from the working directory.
#[test]
fn local_config_file_is_loaded() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("callbook.toml", "[app]\nname = \"local\"\n")?;
        let config = callbook_config::load_config()?;
        assert_eq!(config.app.name, "local");
        Ok(())
    });
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    let config = load_config_from_path(std::path::Path::new("/nonexistent/callbook.toml"))
        .expect("missing file should be silently skipped");
    assert_eq!(config.app.name, "callbook");
}

/// Defaults survive a serialize/deserialize cycle through TOML.
#[test]
fn defaults_serialize_to_loadable_toml() {
    let rendered = toml::to_string(&CallbookConfig::default()).unwrap();
    let config = load_config_from_str(&rendered).unwrap();
    assert_eq!(config.calendar.window_days, 30);
    assert_eq!(config.gateway.port, 3000);
}
