// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name-uniqueness conflict resolution for contact submissions.
//!
//! A submission is validated, then the store is asked whether the name is
//! taken. A free name is inserted. A taken name is either reported back as
//! a conflict or, when the caller confirmed the overwrite, replaced by
//! deleting the old record and inserting the new one.
//!
//! The lookup and the write are separate store calls and are not atomic.
//! The store's unique constraint on `name` turns a lost race into a
//! [`SubmitOutcome::Failed`] instead of a duplicate row.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use callbook_config::model::ContactsConfig;
use callbook_core::{
    CallbookError, Contact, ContactDraft, ContactStore, StoredContact, ValidationErrors,
    ValidationRules,
};

/// Result of a single [`ConflictResolver::submit`] call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The candidate was stored (fresh insert or confirmed overwrite).
    Created(StoredContact),
    /// The name is taken and no overwrite was requested. Nothing was written.
    Conflict(StoredContact),
    /// The candidate failed validation. The store was not touched.
    Rejected(ValidationErrors),
    /// The store could not complete the write.
    Failed(CallbookError),
}

/// Coarse classification of a [`SubmitOutcome`], as reported to clients.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmitStatus {
    Created,
    Conflict,
    ValidationError,
    StorageError,
}

impl SubmitOutcome {
    pub fn status(&self) -> SubmitStatus {
        match self {
            SubmitOutcome::Created(_) => SubmitStatus::Created,
            SubmitOutcome::Conflict(_) => SubmitStatus::Conflict,
            SubmitOutcome::Rejected(_) => SubmitStatus::ValidationError,
            SubmitOutcome::Failed(_) => SubmitStatus::StorageError,
        }
    }

    /// The stored contact (created) or the existing one (conflict).
    pub fn contact(&self) -> Option<&StoredContact> {
        match self {
            SubmitOutcome::Created(c) | SubmitOutcome::Conflict(c) => Some(c),
            _ => None,
        }
    }
}

/// Check-then-act writer that keeps contact names unique.
pub struct ConflictResolver {
    store: Arc<dyn ContactStore>,
    rules: ValidationRules,
    /// Per-name write locks, present when writes are serialized in-process.
    name_locks: Option<DashMap<String, Arc<Mutex<()>>>>,
}

impl ConflictResolver {
    /// Resolver with the given rules and no in-process write serialization.
    pub fn new(store: Arc<dyn ContactStore>, rules: ValidationRules) -> Self {
        Self {
            store,
            rules,
            name_locks: None,
        }
    }

    /// Resolver configured from the `[contacts]` section.
    pub fn from_config(store: Arc<dyn ContactStore>, config: &ContactsConfig) -> Self {
        Self::new(store, config.validation_rules()).with_serialized_writes(config.serialize_writes)
    }

    /// Serialize submissions for the same name within this process.
    pub fn with_serialized_writes(mut self, enabled: bool) -> Self {
        self.name_locks = enabled.then(DashMap::new);
        self
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Look up the record currently holding `name`, without writing anything.
    pub async fn check_only(&self, name: &str) -> Result<Option<StoredContact>, CallbookError> {
        let name = name.trim();
        let existing = self.store.find_by_name(name).await?;
        debug!(name, taken = existing.is_some(), "name check");
        Ok(existing)
    }

    /// Validate `draft` and store it, honoring the overwrite protocol.
    pub async fn submit(&self, draft: &ContactDraft, overwrite: bool) -> SubmitOutcome {
        let candidate = match draft.validate(&self.rules) {
            Ok(contact) => contact,
            Err(errors) => {
                debug!(
                    name = draft.normalized_name(),
                    errors = errors.0.len(),
                    "submission rejected"
                );
                return SubmitOutcome::Rejected(errors);
            }
        };

        let Some(locks) = &self.name_locks else {
            return self.write(candidate, overwrite).await;
        };

        let entry = NameLock::acquire(locks, &candidate.name);
        let _guard = entry.lock.lock().await;
        self.write(candidate, overwrite).await
    }

    async fn write(&self, candidate: Contact, overwrite: bool) -> SubmitOutcome {
        self.try_write(candidate, overwrite)
            .await
            .unwrap_or_else(SubmitOutcome::Failed)
    }

    async fn try_write(
        &self,
        candidate: Contact,
        overwrite: bool,
    ) -> Result<SubmitOutcome, CallbookError> {
        let existing = self.store.find_by_name(&candidate.name).await?;

        let Some(existing) = existing else {
            let stored = self.store.insert(&candidate).await.inspect_err(|e| {
                warn!(name = %candidate.name, error = %e, "insert failed");
            })?;
            info!(name = %stored.name(), id = %stored.id, "contact created");
            return Ok(SubmitOutcome::Created(stored));
        };

        if !overwrite {
            warn!(name = %existing.name(), id = %existing.id, "name already taken, overwrite not confirmed");
            return Ok(SubmitOutcome::Conflict(existing));
        }

        self.store.delete_by_identity(&existing).await.inspect_err(|e| {
            warn!(name = %existing.name(), id = %existing.id, error = %e, "overwrite delete failed");
        })?;
        let stored = self.store.insert(&candidate).await.inspect_err(|e| {
            warn!(
                name = %candidate.name,
                replaced = %existing.id,
                error = %e,
                "overwrite insert failed after delete, name is now absent"
            );
        })?;
        info!(name = %stored.name(), id = %stored.id, replaced = %existing.id, "contact overwritten");
        Ok(SubmitOutcome::Created(stored))
    }
}

/// A per-name lock entry that is pruned from the map once its last holder
/// is gone, including when the submitting future is dropped mid-write.
struct NameLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    name: String,
    lock: Arc<Mutex<()>>,
}

impl<'a> NameLock<'a> {
    fn acquire(locks: &'a DashMap<String, Arc<Mutex<()>>>, name: &str) -> Self {
        let lock = locks.entry(name.to_string()).or_default().clone();
        Self {
            locks,
            name: name.to_string(),
            lock,
        }
    }
}

impl Drop for NameLock<'_> {
    fn drop(&mut self) {
        // Our own clone plus the map's copy.
        self.locks
            .remove_if(&self.name, |_, lock| Arc::strong_count(lock) <= 2);
    }
}
