// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`ContactStore`] trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::OnceCell;
use tracing::debug;

use callbook_config::model::StorageConfig;
use callbook_core::{
    AdapterType, CallbookError, Contact, ContactStore, HealthStatus, PluginAdapter, StoredContact,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed contact store.
///
/// Wraps a [`Database`] handle and delegates to the typed query module.
/// The database is opened by [`ContactStore::initialize`], or lazily on the
/// first query if nobody initialized it.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a store for the configured database. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create a store over an already opened database.
    pub fn with_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    async fn db(&self) -> Result<&Database, CallbookError> {
        self.db
            .get_or_try_init(|| async {
                debug!(path = %self.config.database_path, "opening database on first use");
                Database::open_with(&self.config).await
            })
            .await
    }

    async fn checkpoint(&self) -> Result<(), CallbookError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CallbookError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Degraded("database not opened yet".to_string()));
        };
        let ping = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))
            })
            .await;
        match ping {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), CallbookError> {
        self.checkpoint().await
    }
}

#[async_trait]
impl ContactStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), CallbookError> {
        let db = Database::open_with(&self.config).await?;
        self.db.set(db).map_err(|_| CallbookError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite contact store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), CallbookError> {
        self.checkpoint().await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<StoredContact>, CallbookError> {
        queries::contacts::find_by_name(self.db().await?, name).await
    }

    async fn insert(&self, contact: &Contact) -> Result<StoredContact, CallbookError> {
        queries::contacts::insert(self.db().await?, contact).await
    }

    async fn delete_by_identity(&self, stored: &StoredContact) -> Result<(), CallbookError> {
        queries::contacts::delete_by_identity(self.db().await?, stored).await
    }

    async fn count_by_day_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<String, u32>, CallbookError> {
        queries::contacts::count_by_day_in_range(self.db().await?, start, end).await
    }

    async fn find_by_day(&self, day: NaiveDate) -> Result<Vec<StoredContact>, CallbookError> {
        queries::contacts::find_by_day(self.db().await?, day).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn store_at(path: &Path) -> SqliteStorage {
        SqliteStorage::new(StorageConfig {
            database_path: path.to_string_lossy().into_owned(),
            ..StorageConfig::default()
        })
    }

    fn sample(name: &str) -> Contact {
        Contact {
            name: name.to_string(),
            phone: "0212345678".to_string(),
            email: "desk@example.com".to_string(),
            next_call_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            times_called: 1,
            description: None,
        }
    }

    #[tokio::test]
    async fn identity_and_single_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.db");
        let store = store_at(&path);
        assert_eq!(
            (store.name(), store.adapter_type()),
            ("sqlite", AdapterType::Storage)
        );

        store.initialize().await.unwrap();
        assert!(path.exists());
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_is_degraded_until_opened() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir.path().join("health.db"));

        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn first_query_opens_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lazy.db");
        let store = store_at(&path);

        assert!(!path.exists());
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(store.find_by_day(day).await.unwrap().is_empty());
        assert!(path.exists());
        assert!(matches!(store.health_check().await.unwrap(), HealthStatus::Healthy));
    }

    #[tokio::test]
    async fn close_before_open_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.db");
        let store = store_at(&path);
        store.close().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn full_contact_lifecycle_through_adapter() {
        let db = Database::open_in_memory().await.unwrap();
        let store = SqliteStorage::with_database(StorageConfig::default(), db);

        let first = store.insert(&sample("Mario")).await.unwrap();
        assert!(matches!(
            store.insert(&sample("Mario")).await,
            Err(CallbookError::DuplicateName { .. })
        ));

        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let counts = store.count_by_day_in_range(day, day).await.unwrap();
        assert_eq!(counts.get("2024-06-01"), Some(&1));
        assert_eq!(store.find_by_day(day).await.unwrap(), vec![first.clone()]);

        store.delete_by_identity(&first).await.unwrap();
        assert!(matches!(
            store.delete_by_identity(&first).await,
            Err(CallbookError::StaleRecord { .. })
        ));
        assert!(store.find_by_name("Mario").await.unwrap().is_none());
        assert!(store.count_by_day_in_range(day, day).await.unwrap().is_empty());
    }
}
