// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every backend extends the [`PluginAdapter`] base trait and uses
//! `#[async_trait]` so it can be held as `Arc<dyn ContactStore>`.

pub mod adapter;
pub mod store;

pub use adapter::PluginAdapter;
pub use store::ContactStore;
