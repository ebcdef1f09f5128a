// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat emission and shutdown drain coordination.

use crate::engine::waiter::EpochWaiter;
use crate::engine::{EventJob, SiteJob};
use relay_core::{Clock, HeartbeatCounters, Liveness, ShutdownFlag};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Monitoring cadence when heartbeat emission is disabled; shutdown is
/// still observed on this period.
const MONITOR_INTERVAL: Duration = Duration::from_secs(60);

/// Emits per-period counters and, once shutdown is observed, drains both
/// worker pools before returning.
pub struct HeartbeatController<C: Clock> {
    shutdown: ShutdownFlag,
    waiter: Arc<EpochWaiter<C>>,
    counters: Arc<HeartbeatCounters>,
    interval: Duration,
    get_liveness: Arc<Liveness>,
    run_liveness: Arc<Liveness>,
    sites_tx: mpsc::Sender<SiteJob>,
    events_tx: mpsc::Sender<EventJob>,
    drain_poll: Duration,
}

impl<C: Clock> HeartbeatController<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shutdown: ShutdownFlag,
        waiter: Arc<EpochWaiter<C>>,
        counters: Arc<HeartbeatCounters>,
        interval: Duration,
        get_liveness: Arc<Liveness>,
        run_liveness: Arc<Liveness>,
        sites_tx: mpsc::Sender<SiteJob>,
        events_tx: mpsc::Sender<EventJob>,
        drain_poll: Duration,
    ) -> Self {
        Self {
            shutdown,
            waiter,
            counters,
            interval,
            get_liveness,
            run_liveness,
            sites_tx,
            events_tx,
            drain_poll,
        }
    }

    /// Run until shutdown, then drain. Drain entry depends only on the
    /// shutdown flag, not on whether emission is enabled.
    pub async fn run(self) {
        let emit = !self.interval.is_zero();
        let period = if emit { self.interval } else { MONITOR_INTERVAL };

        loop {
            self.waiter.wait("heartbeat", period).await;
            if self.shutdown.is_tripped() {
                break;
            }
            if emit {
                let (succeeded, errored) = self.counters.take();
                tracing::info!(
                    events_succeeded = succeeded,
                    events_errored = errored,
                    "heartbeat"
                );
            }
        }

        self.drain().await;
    }

    /// Poll both liveness registries, pushing one sentinel per live
    /// worker to unblock channel reads, until every slot is clear.
    pub(crate) async fn drain(&self) {
        tracing::info!("draining worker pools");
        loop {
            let live_get = self.get_liveness.live_count();
            let live_run = self.run_liveness.live_count();
            if live_get == 0 && live_run == 0 {
                break;
            }
            tracing::debug!(
                retrievers = live_get,
                workers = live_run,
                "waiting for worker pools to drain"
            );

            // try_send: a full channel just means the worker already has
            // something to wake on; the next poll retries.
            for _ in 0..live_get {
                let _ = self.sites_tx.try_send(SiteJob::Drain);
            }
            for _ in 0..live_run {
                let _ = self.events_tx.try_send(EventJob::Drain);
            }

            tokio::time::sleep(self.drain_poll).await;
        }
        tracing::info!("drain complete");
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
