// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{Router, routing::get};
use callbook_config::model::GatewayConfig;
use callbook_contacts::ContactService;
use callbook_core::CallbookError;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Contact operations over the process-wide store.
    pub service: Arc<ContactService>,
    /// Deadline applied to every store-backed request.
    pub request_timeout: Duration,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(service: Arc<ContactService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
            start_time: Instant::now(),
        }
    }
}

/// Bind address and request deadline for the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Per-request deadline.
    pub request_timeout: Duration,
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Assemble the router:
/// - GET /health
/// - GET /api/contacts?name= (name check)
/// - POST /api/contacts (submit, optionally overwriting)
/// - GET /api/contacts/daily-counts?anchor=&windowDays=
/// - GET /api/day-contacts?date=
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/api/contacts",
            get(handlers::check_contact).post(handlers::submit_contact),
        )
        .route("/api/contacts/daily-counts", get(handlers::get_daily_counts))
        .route("/api/day-contacts", get(handlers::get_day_contacts))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the gateway until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), CallbookError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CallbookError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| CallbookError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
