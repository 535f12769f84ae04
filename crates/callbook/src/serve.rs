// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `callbook serve` command implementation.
//!
//! Opens the SQLite contact store once for the whole process, starts the
//! HTTP gateway over it, and on SIGINT/SIGTERM stops the gateway before
//! checkpointing and closing the store.

use std::sync::Arc;

use callbook_config::model::CallbookConfig;
use callbook_contacts::ContactService;
use callbook_core::{CallbookError, ContactStore, PluginAdapter};
use callbook_gateway::GatewayServer;
use callbook_gateway::server::ServerConfig;
use callbook_storage::SqliteStorage;
use tracing::{error, info};

use crate::shutdown;

/// Open the configured store and wrap it in a service.
pub async fn open_service(config: &CallbookConfig) -> Result<Arc<ContactService>, CallbookError> {
    let store = SqliteStorage::new(config.storage.clone());
    store.initialize().await?;
    Ok(Arc::new(ContactService::new(Arc::new(store), config)))
}

/// Runs the `callbook serve` command.
pub async fn run_serve(config: CallbookConfig) -> Result<(), CallbookError> {
    info!(
        name = %config.app.name,
        database = %config.storage.database_path,
        "starting callbook"
    );

    let service = open_service(&config).await?;
    let gateway = GatewayServer::new(ServerConfig::from(&config.gateway), service.clone());
    gateway.start().await?;

    let cancel = shutdown::install_signal_handler();
    let server_cancel = gateway.cancellation_token();
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = server_cancel.cancelled() => {}
    }

    let gateway_result = gateway.shutdown().await;
    if let Err(e) = &gateway_result {
        error!(error = %e, "gateway stopped with an error");
    }
    service.shutdown().await?;
    info!("callbook stopped");
    gateway_result
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to
/// stderr so command output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let crates = ["callbook", "callbook_contacts", "callbook_storage", "callbook_gateway"];
        let directives: Vec<String> = crates
            .iter()
            .map(|name| format!("{name}={log_level}"))
            .chain(std::iter::once("warn".to_string()))
            .collect();
        EnvFilter::new(directives.join(","))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
