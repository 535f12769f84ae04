// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A throwaway SQLite contact store for integration tests.
//!
//! `TestHarness` opens a real SQLite contact store in a temp directory and
//! carries a [`CallbookConfig`] pointing at it. The directory is removed
//! when the harness is dropped.

use std::sync::Arc;

use callbook_config::model::CallbookConfig;
use callbook_core::{CallbookError, Contact, ContactStore};
use callbook_storage::SqliteStorage;

/// Seeds and settings for a [`TestHarness`].
pub struct TestHarnessBuilder {
    config: CallbookConfig,
    seed: Vec<Contact>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: CallbookConfig::default(),
            seed: Vec::new(),
        }
    }

    /// Insert `contact` into the store before the harness is handed out.
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.seed.push(contact);
        self
    }

    /// Toggle the per-name write lock in the harness configuration.
    pub fn with_serialize_writes(mut self, enabled: bool) -> Self {
        self.config.contacts.serialize_writes = enabled;
        self
    }

    /// Adjust any other configuration value.
    pub fn with_config(mut self, edit: impl FnOnce(&mut CallbookConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    /// Build the harness: create the temp database and seed it.
    pub async fn build(self) -> Result<TestHarness, CallbookError> {
        let temp_dir = tempfile::TempDir::new().map_err(CallbookError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = self.config;
        config.storage.database_path = db_path.to_string_lossy().to_string();

        let store = SqliteStorage::new(config.storage.clone());
        store.initialize().await?;
        for contact in &self.seed {
            store.insert(contact).await?;
        }

        Ok(TestHarness {
            store: Arc::new(store),
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A SQLite-backed test environment.
pub struct TestHarness {
    /// The contact store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteStorage>,
    /// Configuration whose storage section points at the temp DB.
    pub config: CallbookConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Start with an empty store and default config.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The store as a trait object, the way services hold it.
    pub fn dyn_store(&self) -> Arc<dyn ContactStore> {
        self.store.clone()
    }
}
