// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Termination-signal listener.

use relay_core::ShutdownFlag;
use tokio::signal::unix::{signal, SignalKind};

/// Observe INT, TERM and QUIT; trip the shutdown flag on the first one.
///
/// Termination itself is the drain controller's responsibility; this task
/// only flips the flag and exits.
pub async fn listen(shutdown: ShutdownFlag) {
    let mut interrupt = match signal(SignalKind::interrupt()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(error = %err, "failed to register SIGINT handler");
            return;
        }
    };
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(error = %err, "failed to register SIGTERM handler");
            return;
        }
    };
    let mut quit = match signal(SignalKind::quit()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(error = %err, "failed to register SIGQUIT handler");
            return;
        }
    };

    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
    };

    tracing::info!(signal = name, "termination signal received, shutting down");
    shutdown.trip();
}
