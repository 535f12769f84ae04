// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the store trait, the resolver, and the aggregator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Store-assigned identity of a persisted contact.
///
/// Identities increase monotonically, so ordering by id is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContactId(pub i64);

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Gateway,
}

/// A validated contact, ready to be persisted.
///
/// Only produced by [`crate::validation::ContactDraft::validate`], so every
/// instance satisfies the field rules it was validated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// UTC calendar day of the next scheduled call.
    pub next_call_date: NaiveDate,
    pub times_called: u32,
    /// Opaque rich-text blob; stored and returned untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A contact as it exists in the store, together with its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContact {
    pub id: ContactId,
    #[serde(flatten)]
    pub contact: Contact,
}

impl StoredContact {
    pub fn name(&self) -> &str {
        &self.contact.name
    }
}

/// Number of calls scheduled on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u32,
}

impl DayCount {
    /// Classify this day for calendar coloring.
    pub fn load(&self, thresholds: &LoadThresholds) -> DayLoad {
        if self.count > thresholds.overloaded {
            DayLoad::Overloaded
        } else if self.count > thresholds.busy {
            DayLoad::Busy
        } else {
            DayLoad::Light
        }
    }
}

/// How crowded a calendar day is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DayLoad {
    Light,
    Busy,
    Overloaded,
}

/// Count thresholds above which a day is considered busy or overloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadThresholds {
    pub busy: u32,
    pub overloaded: u32,
}

impl Default for LoadThresholds {
    fn default() -> Self {
        Self {
            busy: 10,
            overloaded: 20,
        }
    }
}
