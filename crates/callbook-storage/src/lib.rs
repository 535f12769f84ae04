// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Callbook.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the contact queries behind
//! [`callbook_core::ContactStore`]. Name uniqueness is enforced by a unique
//! index, so a racing duplicate insert surfaces as
//! [`callbook_core::CallbookError::DuplicateName`].

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
