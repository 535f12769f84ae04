// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory contact store for deterministic testing.
//!
//! `MemoryContactStore` implements [`ContactStore`] over a `Vec` guarded by a
//! tokio mutex. It enforces name uniqueness on insert like the SQLite store,
//! counts calls per operation, and can be told to fail or hang the next call
//! of an operation or to let a competing writer slip in before the next insert.

use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, MutexGuard};

use callbook_core::dates::format_day;
use callbook_core::{
    AdapterType, CallbookError, Contact, ContactId, ContactStore, HealthStatus, PluginAdapter,
    StoredContact,
};

/// Store operations that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FindByName,
    Insert,
    Delete,
    CountByDay,
    FindByDay,
}

#[derive(Default)]
struct State {
    next_id: i64,
    rows: Vec<StoredContact>,
    calls: HashMap<StoreOp, usize>,
    failures: HashMap<StoreOp, usize>,
    stalls: HashMap<StoreOp, usize>,
    interlopers: VecDeque<Contact>,
}

fn take_one(pending: &mut HashMap<StoreOp, usize>, op: StoreOp) -> bool {
    match pending.get_mut(&op) {
        Some(n) if *n > 0 => {
            *n -= 1;
            true
        }
        _ => false,
    }
}

impl State {
    fn record(&mut self, op: StoreOp) -> Result<(), CallbookError> {
        *self.calls.entry(op).or_default() += 1;
        match self.failures.get_mut(&op) {
            Some(pending) if *pending > 0 => {
                *pending -= 1;
                Err(CallbookError::storage(std::io::Error::other(format!(
                    "injected {op:?} failure"
                ))))
            }
            _ => Ok(()),
        }
    }

    fn push(&mut self, contact: Contact) -> Result<StoredContact, CallbookError> {
        if self.rows.iter().any(|row| row.contact.name == contact.name) {
            return Err(CallbookError::DuplicateName { name: contact.name });
        }
        self.next_id += 1;
        let stored = StoredContact {
            id: ContactId(self.next_id),
            contact,
        };
        self.rows.push(stored.clone());
        Ok(stored)
    }
}

/// An in-memory [`ContactStore`].
#[derive(Default)]
pub struct MemoryContactStore {
    state: Mutex<State>,
}

impl MemoryContactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `contacts`, inserted in order.
    pub async fn with_contacts(contacts: impl IntoIterator<Item = Contact>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().await;
            for contact in contacts {
                // Seeding skips duplicates rather than failing the fixture.
                let _ = state.push(contact);
            }
        }
        store
    }

    /// Make the next call of `op` fail with a storage error.
    pub async fn fail_next(&self, op: StoreOp) {
        *self.state.lock().await.failures.entry(op).or_default() += 1;
    }

    /// Make the next call of `op` hang until its future is dropped.
    pub async fn stall_next(&self, op: StoreOp) {
        *self.state.lock().await.stalls.entry(op).or_default() += 1;
    }

    /// Count a call of `op` and apply any injected failure or stall.
    async fn enter(&self, op: StoreOp) -> Result<MutexGuard<'_, State>, CallbookError> {
        let mut state = self.state.lock().await;
        state.record(op)?;
        if take_one(&mut state.stalls, op) {
            drop(state);
            return std::future::pending().await;
        }
        Ok(state)
    }

    /// Insert `contact` right before the next insert runs, as a concurrent writer would.
    pub async fn insert_before_next_insert(&self, contact: Contact) {
        self.state.lock().await.interlopers.push_back(contact);
    }

    /// How many times `op` has been called (including failed calls).
    pub async fn calls(&self, op: StoreOp) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&op)
            .copied()
            .unwrap_or(0)
    }

    /// Total number of store calls of any kind.
    pub async fn total_calls(&self) -> usize {
        self.state.lock().await.calls.values().sum()
    }

    /// Snapshot of every stored row in insertion order.
    pub async fn rows(&self) -> Vec<StoredContact> {
        self.state.lock().await.rows.clone()
    }
}

#[async_trait]
impl PluginAdapter for MemoryContactStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CallbookError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CallbookError> {
        Ok(())
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn initialize(&self) -> Result<(), CallbookError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), CallbookError> {
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<StoredContact>, CallbookError> {
        let mut state = self.enter(StoreOp::FindByName).await?;
        Ok(state.rows.iter().find(|row| row.name() == name).cloned())
    }

    async fn insert(&self, contact: &Contact) -> Result<StoredContact, CallbookError> {
        let mut state = self.enter(StoreOp::Insert).await?;
        if let Some(interloper) = state.interlopers.pop_front() {
            let _ = state.push(interloper);
        }
        state.push(contact.clone())
    }

    async fn delete_by_identity(&self, stored: &StoredContact) -> Result<(), CallbookError> {
        let mut state = self.enter(StoreOp::Delete).await?;
        let before = state.rows.len();
        state.rows.retain(|row| row.id != stored.id);
        if state.rows.len() == before {
            return Err(CallbookError::StaleRecord {
                name: stored.name().to_string(),
                id: stored.id.0,
            });
        }
        Ok(())
    }

    async fn count_by_day_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<String, u32>, CallbookError> {
        let mut state = self.enter(StoreOp::CountByDay).await?;
        let mut counts = BTreeMap::new();
        for row in &state.rows {
            let day = row.contact.next_call_date;
            if day >= start && day <= end {
                *counts.entry(format_day(day)).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn find_by_day(&self, day: NaiveDate) -> Result<Vec<StoredContact>, CallbookError> {
        let mut state = self.enter(StoreOp::FindByDay).await?;
        Ok(state
            .rows
            .iter()
            .filter(|row| row.contact.next_call_date == day)
            .cloned()
            .collect())
    }
}
