// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact store trait: the narrow persistence contract.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CallbookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Contact, StoredContact};

/// Persistence backend for contacts.
///
/// No transactions span calls. Implementations must enforce name uniqueness
/// on `insert` themselves: a second insert for a stored name fails with
/// [`CallbookError::DuplicateName`] instead of creating a duplicate.
#[async_trait]
pub trait ContactStore: PluginAdapter {
    /// Opens the backend eagerly (connection, migrations). Calling it twice is an error.
    async fn initialize(&self) -> Result<(), CallbookError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), CallbookError>;

    /// Looks up the contact stored under exactly `name`.
    async fn find_by_name(&self, name: &str) -> Result<Option<StoredContact>, CallbookError>;

    /// Inserts a new contact and returns it with its assigned identity.
    async fn insert(&self, contact: &Contact) -> Result<StoredContact, CallbookError>;

    /// Deletes the record with the identity of `stored`.
    ///
    /// Fails with [`CallbookError::StaleRecord`] if that record is already gone.
    async fn delete_by_identity(&self, stored: &StoredContact) -> Result<(), CallbookError>;

    /// Counts contacts per `next_call_date` in `[start, end]` (both inclusive),
    /// keyed by `YYYY-MM-DD`. Days without contacts are absent from the map.
    async fn count_by_day_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<String, u32>, CallbookError>;

    /// Returns the contacts whose `next_call_date` is `day`, in insertion order.
    async fn find_by_day(&self, day: NaiveDate) -> Result<Vec<StoredContact>, CallbookError>;
}
