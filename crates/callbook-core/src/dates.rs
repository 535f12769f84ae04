// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar-day normalization.
//!
//! Every date that enters the system is reduced to its UTC calendar day
//! before it is stored or compared. Days cross boundaries as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CallbookError;

/// Wire and storage format for calendar days.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar day from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps are converted to UTC and truncated to the day, so
/// `2024-01-02T23:30:00-02:00` is `2024-01-03`.
pub fn parse_day(raw: &str) -> Result<NaiveDate, CallbookError> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, DAY_FORMAT) {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| CallbookError::InvalidDate {
            value: raw.to_string(),
        })
}

/// Format a calendar day as `YYYY-MM-DD`.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Today's UTC calendar day.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Normalize a timestamp to its UTC calendar day.
pub fn start_of_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}
