// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal handling for graceful shutdown.
//!
//! SIGINT (Ctrl+C) and, on Unix, SIGTERM cancel a [`CancellationToken`]
//! that the server watches.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Spawn a task that cancels the returned token on the first stop signal.
pub fn install_signal_handler() -> CancellationToken {
    let stop = CancellationToken::new();
    let trigger = stop.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        trigger.cancel();
    });
    stop
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "cannot listen for SIGTERM, only Ctrl+C will stop callbook");
            let _ = tokio::signal::ctrl_c().await;
            info!(signal = "SIGINT", "stopping");
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!(signal = "SIGINT", "stopping"),
        _ = sigterm.recv() => info!(signal = "SIGTERM", "stopping"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!(signal = "Ctrl+C", "stopping");
}
