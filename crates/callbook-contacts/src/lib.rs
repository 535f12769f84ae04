// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact scheduling logic for Callbook.
//!
//! Two pieces sit on top of a [`callbook_core::ContactStore`]:
//!
//! - [`ConflictResolver`] - the check-then-act write path that keeps names
//!   unique and only replaces an existing record on explicit overwrite.
//! - [`DayBucketAggregator`] - the read path that turns sparse per-day counts
//!   into a dense, ordered calendar series.
//!
//! [`ContactService`] bundles both behind the operations exposed to clients.

pub mod aggregator;
pub mod resolver;
pub mod service;

pub use aggregator::{DayBucketAggregator, densify};
pub use resolver::{ConflictResolver, SubmitOutcome, SubmitStatus};
pub use service::{CheckResponse, CheckStatus, ContactService, SubmitResponse};
