// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal handling for graceful shutdown.
//!
//! SIGTERM and SIGINT (Ctrl+C) cancel a [`CancellationToken`] that the HTTP
//! server watches; in-flight requests drain before storage is closed.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Installs handlers for SIGTERM and SIGINT.
///
/// Returns a token that is cancelled when either signal arrives.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = wait_for_signal() => trigger.cancel(),
            _ = trigger.cancelled() => {}
        }
        debug!("shutdown signal handler completed");
    });

    token
}

async fn wait_for_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
            _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("received Ctrl+C, initiating shutdown");
    }
}
