// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Callbook.
//!
//! Exposes the contact operations as a small JSON API. The server runs as a
//! background task owned by [`GatewayServer`], which implements
//! [`PluginAdapter`] so it can be health-checked and shut down alongside
//! the store.

pub mod handlers;
pub mod server;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use callbook_contacts::ContactService;
use callbook_core::{AdapterType, CallbookError, HealthStatus, PluginAdapter};

use crate::server::{GatewayState, ServerConfig};

pub use server::build_router;

/// The gateway as a managed background task.
pub struct GatewayServer {
    config: ServerConfig,
    service: Arc<ContactService>,
    cancel: CancellationToken,
    server_handle: Mutex<Option<tokio::task::JoinHandle<Result<(), CallbookError>>>>,
}

impl GatewayServer {
    pub fn new(config: ServerConfig, service: Arc<ContactService>) -> Self {
        Self {
            config,
            service,
            cancel: CancellationToken::new(),
            server_handle: Mutex::new(None),
        }
    }

    /// Token that stops the server when cancelled. It is also cancelled
    /// when the server task exits on its own.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn the server task. Calling it again while running is an error.
    pub async fn start(&self) -> Result<(), CallbookError> {
        let mut handle = self.server_handle.lock().await;
        if handle.is_some() {
            return Err(CallbookError::Internal(
                "gateway server already started".to_string(),
            ));
        }

        let config = self.config.clone();
        let state = GatewayState::new(self.service.clone(), config.request_timeout);
        let cancel = self.cancel.clone();
        *handle = Some(tokio::spawn(async move {
            let result = server::start_server(&config, state, cancel.clone()).await;
            // An early exit (bind failure) must still wake whoever waits on the token.
            cancel.cancel();
            result
        }));

        tracing::info!(
            "Gateway started on {}:{}",
            self.config.host,
            self.config.port
        );
        Ok(())
    }

    /// Wait for the server task to finish (after cancellation or a bind failure).
    pub async fn wait(&self) -> Result<(), CallbookError> {
        let handle = self.server_handle.lock().await.take();
        match handle {
            Some(h) => h
                .await
                .map_err(|e| CallbookError::Internal(format!("gateway task failed: {e}")))?,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PluginAdapter for GatewayServer {
    fn name(&self) -> &str {
        "gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, CallbookError> {
        let handle = self.server_handle.lock().await;
        match handle.as_ref() {
            Some(h) if !h.is_finished() => Ok(HealthStatus::Healthy),
            Some(_) => Ok(HealthStatus::Unhealthy("server task exited".to_string())),
            None => Ok(HealthStatus::Unhealthy("server not started".to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), CallbookError> {
        self.cancel.cancel();
        self.wait().await
    }
}
