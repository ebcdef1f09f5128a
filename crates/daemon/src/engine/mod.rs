// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine wiring: channels, worker pools, heartbeat and drain.

pub mod backoff;
pub mod events;
pub mod heartbeat;
pub mod signal;
pub mod sites;
pub mod waiter;
pub mod workers;

use crate::engine::backoff::BackoffGovernor;
use crate::engine::events::EventRetriever;
use crate::engine::heartbeat::HeartbeatController;
use crate::engine::sites::SiteRetriever;
use crate::engine::waiter::EpochWaiter;
use crate::engine::workers::{fan_in, EventWorker};
use relay_adapters::Invoker;
use relay_core::{Clock, Event, HeartbeatCounters, Liveness, ShutdownFlag, Site};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Message on the sites channel. `Drain` wakes a blocked retriever during
/// shutdown so it can re-observe the flag; it is never fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteJob {
    Fetch(Site),
    Drain,
}

/// Message on the event channels. `Drain` wakes a blocked worker during
/// shutdown; it never reaches the external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventJob {
    Run(Event),
    Drain,
}

/// Multi-consumer end of a work channel, shared across a pool.
pub(crate) type SharedRx<T> = Arc<tokio::sync::Mutex<mpsc::Receiver<T>>>;

/// Pool sizes and intervals resolved from configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub workers_get: usize,
    pub workers_run: usize,
    pub get_events_interval: Duration,
    /// Zero disables heartbeat emission but keeps shutdown monitoring.
    pub heartbeat: Duration,
}

/// Fixed pacing intervals. Tests shrink these to keep the suite fast.
#[derive(Debug, Clone)]
pub(crate) struct Tuning {
    /// Sleep after each site's batch, limiting upstream load.
    pub(crate) site_pacing: Duration,
    /// Epoch period between run attempts on one worker.
    pub(crate) run_break: Duration,
    /// Drain controller poll interval.
    pub(crate) drain_poll: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            site_pacing: Duration::from_secs(1),
            run_break: Duration::from_secs(10),
            drain_poll: Duration::from_secs(3),
        }
    }
}

/// The assembled pipeline: site discovery feeding event retrievers feeding
/// run workers, monitored by the heartbeat controller.
pub struct Engine<I, C> {
    invoker: Arc<I>,
    clock: C,
    shutdown: ShutdownFlag,
    settings: EngineSettings,
    tuning: Tuning,
}

impl<I: Invoker, C: Clock> Engine<I, C> {
    pub fn new(invoker: Arc<I>, clock: C, shutdown: ShutdownFlag, settings: EngineSettings) -> Self {
        Self {
            invoker,
            clock,
            shutdown,
            settings,
            tuning: Tuning::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Run the pipeline until a clean drain completes.
    ///
    /// Worker tasks are detached; the heartbeat controller owns the drain
    /// and returns only once both liveness registries are all-false.
    pub async fn run(self) {
        let waiter = Arc::new(EpochWaiter::new(self.clock.clone(), self.shutdown.clone()));
        let counters = Arc::new(HeartbeatCounters::new());
        let get_liveness = Arc::new(Liveness::new(self.settings.workers_get));
        let run_liveness = Arc::new(Liveness::new(self.settings.workers_run));

        let (sites_tx, sites_rx) = mpsc::channel::<SiteJob>(1);
        let (events_tx, events_rx) = mpsc::channel::<EventJob>(1);
        let (pool_tx, pool_rx) = mpsc::channel::<EventJob>(1);
        let sites_rx: SharedRx<SiteJob> = Arc::new(tokio::sync::Mutex::new(sites_rx));
        let pool_rx: SharedRx<EventJob> = Arc::new(tokio::sync::Mutex::new(pool_rx));

        let retriever = SiteRetriever::new(
            Arc::clone(&self.invoker),
            BackoffGovernor::new(self.clock.clone(), self.shutdown.clone()),
            Arc::clone(&waiter),
            self.shutdown.clone(),
            self.settings.get_events_interval,
        );
        tokio::spawn(retriever.run(sites_tx.clone()));

        for ordinal in 0..self.settings.workers_get {
            let worker = EventRetriever::new(
                ordinal,
                Arc::clone(&self.invoker),
                self.shutdown.clone(),
                Arc::clone(&get_liveness),
                self.tuning.site_pacing,
            );
            tokio::spawn(worker.run(Arc::clone(&sites_rx), events_tx.clone()));
        }

        tokio::spawn(fan_in(events_rx, pool_tx));

        for ordinal in 0..self.settings.workers_run {
            let worker = EventWorker::new(
                ordinal,
                Arc::clone(&self.invoker),
                self.clock.clone(),
                self.shutdown.clone(),
                Arc::clone(&run_liveness),
                Arc::clone(&waiter),
                Arc::clone(&counters),
                !self.settings.heartbeat.is_zero(),
                self.tuning.run_break,
            );
            tokio::spawn(worker.run(Arc::clone(&pool_rx)));
        }

        let controller = HeartbeatController::new(
            self.shutdown.clone(),
            waiter,
            counters,
            self.settings.heartbeat,
            get_liveness,
            run_liveness,
            sites_tx,
            events_tx,
            self.tuning.drain_poll,
        );
        controller.run().await;
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
