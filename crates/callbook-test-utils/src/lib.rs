// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Callbook integration tests.
//!
//! Provides an in-memory store and a test harness over a throwaway SQLite
//! database, so resolver and aggregator tests run without shared state.
//!
//! # Components
//!
//! - [`MemoryContactStore`] - in-memory [`callbook_core::ContactStore`] with fault injection
//! - [`TestHarness`] - temp-dir SQLite store plus a matching configuration

pub mod fixtures;
pub mod harness;
pub mod memory_store;

pub use fixtures::{contact, day, draft};
pub use harness::TestHarness;
pub use memory_store::{MemoryContactStore, StoreOp};
