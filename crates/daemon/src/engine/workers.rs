// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event execution: the run-worker pool and its fan-in coordinator.

use crate::engine::waiter::EpochWaiter;
use crate::engine::{EventJob, SharedRx};
use relay_adapters::Invoker;
use relay_core::{Clock, Event, HeartbeatCounters, Liveness, ShutdownFlag};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Forward the main event channel onto the pool's internal channel.
///
/// The coordinator is the internal channel's only sender, so dropping
/// `tx` when the main channel closes terminates every worker's receive
/// loop without ambiguity over who closes.
pub(crate) async fn fan_in(mut rx: mpsc::Receiver<EventJob>, tx: mpsc::Sender<EventJob>) {
    while let Some(job) = rx.recv().await {
        if tx.send(job).await.is_err() {
            break;
        }
    }
}

fn run_args(event: &Event) -> Vec<String> {
    vec![
        "cron-control".to_string(),
        "orchestrate".to_string(),
        "runner-only".to_string(),
        "run".to_string(),
        format!("--timestamp={}", event.timestamp),
        format!("--action={}", event.action),
        format!("--instance={}", event.instance),
        format!("--url={}", event.url),
    ]
}

/// One member of the run-worker pool.
pub struct EventWorker<I, C: Clock> {
    ordinal: usize,
    invoker: Arc<I>,
    clock: C,
    shutdown: ShutdownFlag,
    liveness: Arc<Liveness>,
    waiter: Arc<EpochWaiter<C>>,
    counters: Arc<HeartbeatCounters>,
    count_outcomes: bool,
    run_break: Duration,
}

impl<I: Invoker, C: Clock> EventWorker<I, C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ordinal: usize,
        invoker: Arc<I>,
        clock: C,
        shutdown: ShutdownFlag,
        liveness: Arc<Liveness>,
        waiter: Arc<EpochWaiter<C>>,
        counters: Arc<HeartbeatCounters>,
        count_outcomes: bool,
        run_break: Duration,
    ) -> Self {
        Self {
            ordinal,
            invoker,
            clock,
            shutdown,
            liveness,
            waiter,
            counters,
            count_outcomes,
            run_break,
        }
    }

    /// Run one event through the external tool; true on success.
    pub(crate) async fn execute(&self, event: &Event) -> bool {
        let args = run_args(event);
        match self.invoker.invoke(&args).await {
            Ok(_) => {
                tracing::debug!(
                    worker = self.ordinal,
                    url = %event.url,
                    action = %event.action,
                    "event ran"
                );
                true
            }
            Err(err) => {
                tracing::debug!(
                    worker = self.ordinal,
                    ?args,
                    error = %err,
                    "event run failed"
                );
                false
            }
        }
    }

    pub async fn run(self, rx: SharedRx<EventJob>) {
        self.liveness.enter(self.ordinal);
        let label = format!("run-events-{}", self.ordinal);

        loop {
            if self.shutdown.is_tripped() {
                break;
            }

            let job = { rx.lock().await.recv().await };
            let event = match job {
                None => break,
                Some(EventJob::Drain) => continue,
                Some(EventJob::Run(event)) => event,
            };
            if self.shutdown.is_tripped() {
                break;
            }

            // Premature events are dropped, not re-enqueued; the upstream
            // surfaces them again on the next fetch.
            if event.timestamp > self.clock.epoch_secs() as i64 {
                tracing::debug!(
                    worker = self.ordinal,
                    url = %event.url,
                    timestamp = event.timestamp,
                    "event not due yet, skipping"
                );
                continue;
            }

            let succeeded = self.execute(&event).await;
            if self.count_outcomes {
                if succeeded {
                    self.counters.record_success();
                } else {
                    self.counters.record_error();
                }
            }

            self.waiter.wait(&label, self.run_break).await;
        }

        self.liveness.exit(self.ordinal);
        tracing::debug!(worker = self.ordinal, "event worker exiting");
    }
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
