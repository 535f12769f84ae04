// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Callbook.
//!
//! Defines the contact record model and its validation rules, the
//! [`ContactStore`] persistence contract, calendar-day normalization, and
//! the shared error type. Every other crate in the workspace builds on these.

pub mod dates;
pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export key items at crate root for ergonomic imports.
pub use error::CallbookError;
pub use traits::{ContactStore, PluginAdapter};
pub use types::{
    AdapterType, Contact, ContactId, DayCount, DayLoad, HealthStatus, LoadThresholds,
    StoredContact,
};
pub use validation::{ContactDraft, ContactField, FieldError, ValidationErrors, ValidationRules};
