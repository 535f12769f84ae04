// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the contact API.
//!
//! Every store-backed handler runs under the gateway's request deadline.
//! A deadline miss answers 504 and is otherwise treated like a storage error.

use std::future::Future;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use callbook_contacts::{CheckStatus, SubmitResponse, SubmitStatus};
use callbook_core::{CallbookError, ContactDraft, HealthStatus};

use crate::server::GatewayState;

/// Query for GET /api/contacts.
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub name: String,
}

/// Body for POST /api/contacts: the contact fields plus the overwrite flag.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(flatten)]
    pub draft: ContactDraft,
    #[serde(default)]
    pub overwrite: bool,
}

/// Query for GET /api/contacts/daily-counts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCountsQuery {
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub window_days: Option<u32>,
}

/// Query for GET /api/day-contacts.
#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", "degraded", or "unavailable".
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway state was created.
    pub uptime_secs: u64,
    /// Detail from the store health check, if not healthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

fn error_status(err: &CallbookError) -> StatusCode {
    match err {
        CallbookError::InvalidDate { .. } | CallbookError::InvalidWindow { .. } => {
            StatusCode::BAD_REQUEST
        }
        CallbookError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: CallbookError) -> Response {
    let status = error_status(&err);
    if status.is_server_error() {
        tracing::warn!(error = %err, "request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

async fn with_deadline<T>(
    state: &GatewayState,
    work: impl Future<Output = T>,
) -> Result<T, CallbookError> {
    tokio::time::timeout(state.request_timeout, work)
        .await
        .map_err(|_| CallbookError::Timeout {
            duration: state.request_timeout,
        })
}

/// GET /api/contacts?name=
///
/// 200 `{"status":"ok"}` when the name is free, 409 with the holder otherwise.
pub async fn check_contact(
    State(state): State<GatewayState>,
    Query(query): Query<CheckQuery>,
) -> Response {
    match with_deadline(&state, state.service.check_contact(&query.name)).await {
        Ok(Ok(check)) => {
            let status = match check.status {
                CheckStatus::Ok => StatusCode::OK,
                CheckStatus::Conflict => StatusCode::CONFLICT,
            };
            (status, Json(check)).into_response()
        }
        Ok(Err(e)) | Err(e) => error_response(e),
    }
}

/// A body that is JSON but does not fit the contact shape is a validation
/// error like any other; a wrong content type keeps axum's own answer.
fn malformed_submission(rejection: JsonRejection) -> Response {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            let response = SubmitResponse {
                status: SubmitStatus::ValidationError,
                contact: None,
                errors: None,
                message: Some(rejection.body_text()),
            };
            (StatusCode::BAD_REQUEST, Json(response)).into_response()
        }
        other => other.into_response(),
    }
}

/// POST /api/contacts
///
/// 201 created, 409 conflict (existing contact returned), 400 with
/// per-field errors or an undecodable body, 500 storage error, 504 deadline
/// exceeded.
pub async fn submit_contact(
    State(state): State<GatewayState>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return malformed_submission(rejection),
    };
    let response: SubmitResponse = match with_deadline(
        &state,
        state.service.submit_contact(&body.draft, body.overwrite),
    )
    .await
    {
        Ok(response) => response,
        Err(e) => return error_response(e),
    };
    let status = match response.status {
        SubmitStatus::Created => StatusCode::CREATED,
        SubmitStatus::Conflict => StatusCode::CONFLICT,
        SubmitStatus::ValidationError => StatusCode::BAD_REQUEST,
        SubmitStatus::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(response)).into_response()
}

/// GET /api/contacts/daily-counts?anchor=YYYY-MM-DD&windowDays=N
pub async fn get_daily_counts(
    State(state): State<GatewayState>,
    Query(query): Query<DailyCountsQuery>,
) -> Response {
    let work = state
        .service
        .get_daily_counts(query.anchor.as_deref(), query.window_days);
    match with_deadline(&state, work).await {
        Ok(Ok(series)) => Json(series).into_response(),
        Ok(Err(e)) | Err(e) => error_response(e),
    }
}

/// GET /api/day-contacts?date=YYYY-MM-DD
pub async fn get_day_contacts(
    State(state): State<GatewayState>,
    Query(query): Query<DayQuery>,
) -> Response {
    match with_deadline(&state, state.service.get_contacts_on_day(&query.date)).await {
        Ok(Ok(contacts)) => Json(contacts).into_response(),
        Ok(Err(e)) | Err(e) => error_response(e),
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let unavailable = StatusCode::SERVICE_UNAVAILABLE;
    let (code, status, detail) = match with_deadline(&state, state.service.health()).await {
        Ok(Ok(HealthStatus::Healthy)) => (StatusCode::OK, "ok", None),
        Ok(Ok(HealthStatus::Degraded(d))) => (StatusCode::OK, "degraded", Some(d)),
        Ok(Ok(HealthStatus::Unhealthy(d))) => (unavailable, "unavailable", Some(d)),
        Ok(Err(e)) | Err(e) => (unavailable, "unavailable", Some(e.to_string())),
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.start_time.elapsed().as_secs(),
            detail,
        }),
    )
        .into_response()
}
