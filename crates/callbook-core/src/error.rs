// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Callbook.

use thiserror::Error;

/// The primary error type shared by the store trait, the resolver, and the aggregator.
#[derive(Debug, Error)]
pub enum CallbookError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store's unique constraint on `name` rejected an insert.
    #[error("a contact named `{name}` already exists in the store")]
    DuplicateName { name: String },

    /// A delete targeted a record that is no longer present.
    #[error("contact `{name}` (id {id}) is no longer in the store")]
    StaleRecord { name: String, id: i64 },

    /// A date value could not be read as a calendar day.
    #[error("invalid date `{value}`: expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { value: String },

    /// A calendar window was out of the accepted range.
    #[error("invalid window of {window_days} days (maximum {max_days})")]
    InvalidWindow { window_days: u32, max_days: u32 },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CallbookError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CallbookError::Storage {
            source: Box::new(err),
        }
    }

    /// True for errors that originate in (or are reported by) the store.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            CallbookError::Storage { .. }
                | CallbookError::DuplicateName { .. }
                | CallbookError::StaleRecord { .. }
                | CallbookError::Timeout { .. }
        )
    }
}
