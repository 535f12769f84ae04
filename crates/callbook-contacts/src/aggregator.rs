// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Day-bucket aggregation for the call calendar.
//!
//! The store reports counts only for days that have contacts. The
//! aggregator walks every day of the requested window and fills the gaps
//! with zero, so consumers always get one entry per day.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::debug;

use callbook_config::model::CalendarConfig;
use callbook_core::dates::{format_day, today_utc};
use callbook_core::{CallbookError, ContactStore, DayCount, StoredContact};

/// Dense day series for `[start, end]`, taking counts from `counts` (keyed by `YYYY-MM-DD`).
pub fn densify(start: NaiveDate, end: NaiveDate, counts: &BTreeMap<String, u32>) -> Vec<DayCount> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| DayCount {
            date,
            count: counts.get(&format_day(date)).copied().unwrap_or(0),
        })
        .collect()
}

/// Read path behind the calendar view.
pub struct DayBucketAggregator {
    store: Arc<dyn ContactStore>,
    default_window_days: u32,
    max_window_days: u32,
}

impl DayBucketAggregator {
    pub fn new(
        store: Arc<dyn ContactStore>,
        default_window_days: u32,
        max_window_days: u32,
    ) -> Self {
        Self {
            store,
            default_window_days,
            max_window_days,
        }
    }

    pub fn from_config(store: Arc<dyn ContactStore>, config: &CalendarConfig) -> Self {
        Self::new(store, config.window_days, config.max_window_days)
    }

    pub fn default_window_days(&self) -> u32 {
        self.default_window_days
    }

    /// Per-day counts over `[anchor, anchor + window_days]`, both ends included.
    pub async fn daily_counts(
        &self,
        anchor: NaiveDate,
        window_days: u32,
    ) -> Result<Vec<DayCount>, CallbookError> {
        let invalid = || CallbookError::InvalidWindow {
            window_days,
            max_days: self.max_window_days,
        };
        if window_days > self.max_window_days {
            return Err(invalid());
        }
        let end = anchor
            .checked_add_days(Days::new(u64::from(window_days)))
            .ok_or_else(invalid)?;

        let counts = self.store.count_by_day_in_range(anchor, end).await?;
        debug!(
            start = %anchor,
            %end,
            busy_days = counts.len(),
            "aggregating daily counts"
        );
        Ok(densify(anchor, end, &counts))
    }

    /// The default window starting today (UTC).
    pub async fn upcoming(&self) -> Result<Vec<DayCount>, CallbookError> {
        self.daily_counts(today_utc(), self.default_window_days).await
    }

    /// Contacts due on exactly `day`, in insertion order.
    pub async fn contacts_on_day(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<StoredContact>, CallbookError> {
        self.store.find_by_day(day).await
    }
}
