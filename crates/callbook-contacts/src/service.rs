// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-facing contact operations.
//!
//! [`ContactService`] owns one resolver and one aggregator over a shared
//! store and speaks in wire-ready shapes: date strings in, serializable
//! responses out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;

use callbook_config::model::CallbookConfig;
use callbook_core::dates::{parse_day, today_utc};
use callbook_core::{
    CallbookError, ContactDraft, ContactStore, DayCount, HealthStatus, LoadThresholds,
    StoredContact, ValidationErrors,
};

use crate::aggregator::DayBucketAggregator;
use crate::resolver::{ConflictResolver, SubmitOutcome, SubmitStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Conflict,
}

/// Answer to a name check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<StoredContact>,
}

/// Answer to a submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: SubmitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<StoredContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SubmitOutcome> for SubmitResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        let status = outcome.status();
        let (contact, errors, message) = match outcome {
            SubmitOutcome::Created(c) => (Some(c), None, None),
            SubmitOutcome::Conflict(c) => (
                Some(c),
                None,
                Some("a contact with this name already exists".to_string()),
            ),
            SubmitOutcome::Rejected(e) => {
                let message = e.to_string();
                (None, Some(e), Some(message))
            }
            SubmitOutcome::Failed(e) => (None, None, Some(e.to_string())),
        };
        Self {
            status,
            contact,
            errors,
            message,
        }
    }
}

/// Resolver, aggregator, and calendar thresholds over one store.
pub struct ContactService {
    store: Arc<dyn ContactStore>,
    resolver: ConflictResolver,
    aggregator: DayBucketAggregator,
    thresholds: LoadThresholds,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>, config: &CallbookConfig) -> Self {
        Self {
            resolver: ConflictResolver::from_config(store.clone(), &config.contacts),
            aggregator: DayBucketAggregator::from_config(store.clone(), &config.calendar),
            thresholds: config.calendar.thresholds(),
            store,
        }
    }

    pub fn resolver(&self) -> &ConflictResolver {
        &self.resolver
    }

    pub fn aggregator(&self) -> &DayBucketAggregator {
        &self.aggregator
    }

    pub fn thresholds(&self) -> LoadThresholds {
        self.thresholds
    }

    /// Is `name` free? If not, return the record holding it.
    pub async fn check_contact(&self, name: &str) -> Result<CheckResponse, CallbookError> {
        Ok(match self.resolver.check_only(name).await? {
            Some(existing) => CheckResponse {
                status: CheckStatus::Conflict,
                contact: Some(existing),
            },
            None => CheckResponse {
                status: CheckStatus::Ok,
                contact: None,
            },
        })
    }

    pub async fn submit_contact(&self, draft: &ContactDraft, overwrite: bool) -> SubmitResponse {
        self.resolver.submit(draft, overwrite).await.into()
    }

    /// Dense counts from `anchor` (default today) over `window_days` (default from config).
    pub async fn get_daily_counts(
        &self,
        anchor: Option<&str>,
        window_days: Option<u32>,
    ) -> Result<Vec<DayCount>, CallbookError> {
        let window_days = window_days.unwrap_or(self.aggregator.default_window_days());
        let anchor = anchor.map(parse_day).transpose()?.unwrap_or_else(today_utc);
        self.aggregator.daily_counts(anchor, window_days).await
    }

    pub async fn get_contacts_on_day(
        &self,
        date: &str,
    ) -> Result<Vec<StoredContact>, CallbookError> {
        self.aggregator.contacts_on_day(parse_day(date)?).await
    }

    pub async fn health(&self) -> Result<HealthStatus, CallbookError> {
        self.store.health_check().await
    }

    /// Flush and release the store.
    pub async fn shutdown(&self) -> Result<(), CallbookError> {
        self.store.close().await?;
        self.store.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callbook_test_utils::{MemoryContactStore, contact, day, draft};

    async fn service_with(contacts: Vec<callbook_core::Contact>) -> ContactService {
        let store = Arc::new(MemoryContactStore::with_contacts(contacts).await);
        ContactService::new(store, &CallbookConfig::default())
    }

    #[tokio::test]
    async fn check_reports_ok_and_conflict() {
        let svc = service_with(vec![contact("Mario Rossi", day(2024, 1, 2))]).await;

        let free = svc.check_contact("Luigi").await.unwrap();
        assert_eq!(free.status, CheckStatus::Ok);
        assert!(free.contact.is_none());

        let taken = svc.check_contact("Mario Rossi").await.unwrap();
        assert_eq!(taken.status, CheckStatus::Conflict);
        assert_eq!(taken.contact.unwrap().name(), "Mario Rossi");
    }

    #[tokio::test]
    async fn check_response_wire_shape() {
        let svc = service_with(vec![]).await;
        let json = serde_json::to_value(svc.check_contact("Al").await.unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn submit_response_carries_field_errors() {
        let svc = service_with(vec![]).await;
        let mut bad = draft("A", day(2024, 1, 2));
        bad.email = "nope".into();

        let response = svc.submit_contact(&bad, false).await;
        assert_eq!(response.status, SubmitStatus::ValidationError);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "validation_error");
        let fields: Vec<&str> = json["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["name", "email"]);
    }

    #[tokio::test]
    async fn conflict_response_returns_existing_contact() {
        let svc = service_with(vec![contact("Mario Rossi", day(2024, 1, 2))]).await;
        let response = svc
            .submit_contact(&draft("Mario Rossi", day(2024, 5, 5)), false)
            .await;
        assert_eq!(response.status, SubmitStatus::Conflict);
        let existing = response.contact.unwrap();
        assert_eq!(existing.contact.next_call_date, day(2024, 1, 2));
    }

    #[tokio::test]
    async fn daily_counts_parse_the_anchor() {
        let svc = service_with(vec![contact("Mario", day(2024, 1, 2))]).await;
        let series = svc
            .get_daily_counts(Some("2024-01-01"), Some(3))
            .await
            .unwrap();
        let counts: Vec<u32> = series.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 1, 0, 0]);
    }

    #[tokio::test]
    async fn daily_counts_default_to_configured_window() {
        let svc = service_with(vec![]).await;
        let series = svc.get_daily_counts(None, None).await.unwrap();
        assert_eq!(series.len(), 31);
    }

    #[tokio::test]
    async fn bad_dates_are_invalid_date_errors() {
        let svc = service_with(vec![]).await;
        assert!(matches!(
            svc.get_daily_counts(Some("01/02/2024"), None).await,
            Err(CallbookError::InvalidDate { .. })
        ));
        assert!(matches!(
            svc.get_contacts_on_day("tomorrow").await,
            Err(CallbookError::InvalidDate { .. })
        ));
    }

    #[tokio::test]
    async fn contacts_on_day_accepts_timestamps() {
        let svc = service_with(vec![contact("Mario", day(2024, 1, 2))]).await;
        let found = svc
            .get_contacts_on_day("2024-01-02T09:30:00Z")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
