// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All reads and writes are serialized through tokio-rusqlite's single
//! background thread. Do NOT create additional Connection instances for writes.

use std::time::Duration;

use callbook_config::model::StorageConfig;
use callbook_core::CallbookError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into [`CallbookError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> CallbookError {
    CallbookError::storage(e)
}

/// Handle to the contacts database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` with default settings and run migrations.
    pub async fn open(path: &str) -> Result<Self, CallbookError> {
        Self::open_with(&StorageConfig {
            database_path: path.to_string(),
            ..StorageConfig::default()
        })
        .await
    }

    /// Open the database described by `config` and run migrations.
    pub async fn open_with(config: &StorageConfig) -> Result<Self, CallbookError> {
        if let Some(parent) = std::path::Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(CallbookError::storage)?;
        }
        let conn = tokio_rusqlite::Connection::open(&config.database_path)
            .await
            .map_err(CallbookError::storage)?;
        let db = Self { conn };
        db.prepare(config.wal_mode, Duration::from_millis(config.busy_timeout_ms))
            .await?;
        debug!(path = %config.database_path, wal = config.wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database (tests and throwaway runs).
    pub async fn open_in_memory() -> Result<Self, CallbookError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(CallbookError::storage)?;
        let db = Self { conn };
        db.prepare(false, Duration::from_millis(0)).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool, busy_timeout: Duration) -> Result<(), CallbookError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.busy_timeout(busy_timeout)?;
                if wal_mode {
                    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
                }
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        let applied = self
            .conn
            .call(|conn| -> Result<usize, refinery::Error> { migrations::run_migrations(conn) })
            .await
            .map_err(CallbookError::storage)?;
        if applied > 0 {
            debug!(applied, "migrations applied");
        }
        Ok(())
    }

    /// The underlying single-writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), CallbookError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), CallbookError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(CallbookError::storage)
    }
}
