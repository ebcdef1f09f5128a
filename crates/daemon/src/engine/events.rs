// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event retrieval: fetch each site's due-event batch and feed the
//! worker pool.

use crate::engine::{EventJob, SharedRx, SiteJob};
use relay_adapters::Invoker;
use relay_core::{DueEvent, Event, Liveness, ShutdownFlag, Site};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

/// Upper bound on one forward attempt; the shutdown flag is re-checked
/// between attempts. Run workers exit without draining the channel during
/// shutdown, so an unbounded send here could block past the drain.
const SEND_SLICE: Duration = Duration::from_secs(1);

fn list_due_batch_args(url: &str) -> Vec<String> {
    vec![
        "cron-control".to_string(),
        "orchestrate".to_string(),
        "runner-only".to_string(),
        "list-due-batch".to_string(),
        format!("--url={url}"),
        "--format=json".to_string(),
    ]
}

/// One member of the event retriever pool.
pub struct EventRetriever<I> {
    ordinal: usize,
    invoker: Arc<I>,
    shutdown: ShutdownFlag,
    liveness: Arc<Liveness>,
    pacing: Duration,
}

impl<I: Invoker> EventRetriever<I> {
    pub fn new(
        ordinal: usize,
        invoker: Arc<I>,
        shutdown: ShutdownFlag,
        liveness: Arc<Liveness>,
        pacing: Duration,
    ) -> Self {
        Self {
            ordinal,
            invoker,
            shutdown,
            liveness,
            pacing,
        }
    }

    /// Fetch the due-event batch for one site, each event stamped with
    /// the site's URL. Invocation or decode failure skips the site.
    pub(crate) async fn fetch_due(&self, site: &Site) -> Vec<Event> {
        let args = list_due_batch_args(&site.url);
        let raw = match self.invoker.invoke(&args).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(
                    worker = self.ordinal,
                    url = %site.url,
                    error = %err,
                    "list-due-batch invocation failed"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<DueEvent>>(&raw) {
            Ok(due) => due
                .into_iter()
                .map(|event| event.into_event(&site.url))
                .collect(),
            Err(err) => {
                tracing::debug!(
                    worker = self.ordinal,
                    url = %site.url,
                    error = %err,
                    raw,
                    "list-due-batch decode failed"
                );
                Vec::new()
            }
        }
    }

    pub async fn run(self, rx: SharedRx<SiteJob>, tx: mpsc::Sender<EventJob>) {
        self.liveness.enter(self.ordinal);
        'sites: loop {
            if self.shutdown.is_tripped() {
                break;
            }

            let job = { rx.lock().await.recv().await };
            let site = match job {
                None => break,
                Some(SiteJob::Drain) => continue,
                Some(SiteJob::Fetch(site)) => site,
            };
            if self.shutdown.is_tripped() {
                break;
            }

            let events = self.fetch_due(&site).await;
            tracing::debug!(
                worker = self.ordinal,
                url = %site.url,
                count = events.len(),
                "fetched due events"
            );

            for event in events {
                let mut job = EventJob::Run(event);
                loop {
                    if self.shutdown.is_tripped() {
                        break 'sites;
                    }
                    match tx.send_timeout(job, SEND_SLICE).await {
                        Ok(()) => break,
                        Err(SendTimeoutError::Timeout(returned)) => job = returned,
                        Err(SendTimeoutError::Closed(_)) => break 'sites,
                    }
                }
            }

            tokio::time::sleep(self.pacing).await;
        }
        self.liveness.exit(self.ordinal);
        tracing::debug!(worker = self.ordinal, "event retriever exiting");
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
