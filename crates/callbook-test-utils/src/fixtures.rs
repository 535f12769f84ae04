// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small builders for contacts and drafts used across test suites.

use callbook_core::validation::CountInput;
use callbook_core::{Contact, ContactDraft};
use chrono::NaiveDate;

/// Calendar day shorthand. Panics on an impossible date.
pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("invalid test date {y}-{m}-{d}"))
}

/// A valid contact named `name`, due on `next_call_date`.
pub fn contact(name: &str, next_call_date: NaiveDate) -> Contact {
    Contact {
        name: name.to_string(),
        phone: "3331234567".to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        next_call_date,
        times_called: 0,
        description: None,
    }
}

/// A draft that validates into [`contact`] with the same arguments.
pub fn draft(name: &str, next_call_date: NaiveDate) -> ContactDraft {
    let c = contact(name, next_call_date);
    ContactDraft {
        name: c.name,
        phone: c.phone,
        email: c.email,
        next_call_date: Some(next_call_date.format("%Y-%m-%d").to_string()),
        times_called: Some(CountInput::from(0u32)),
        description: None,
    }
}
