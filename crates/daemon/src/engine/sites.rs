// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Site discovery: instance info, enumeration, shuffle, fan-out.

use crate::engine::backoff::BackoffGovernor;
use crate::engine::waiter::EpochWaiter;
use crate::engine::SiteJob;
use rand::Rng;
use relay_adapters::Invoker;
use relay_core::{Clock, ShutdownFlag, Site, SiteInfo};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn get_info_args() -> Vec<String> {
    [
        "cron-control",
        "orchestrate",
        "runner-only",
        "get-info",
        "--format=json",
    ]
    .map(String::from)
    .to_vec()
}

fn site_list_args() -> Vec<String> {
    [
        "site",
        "list",
        "--fields=url",
        "--archived=false",
        "--deleted=false",
        "--spam=false",
        "--format=json",
    ]
    .map(String::from)
    .to_vec()
}

/// In-order Fisher-Yates pass: for each index, swap with a uniformly
/// chosen earlier-or-equal index. Removes enumeration-order bias across
/// the retriever pool.
pub(crate) fn shuffle_sites(sites: &mut [Site]) {
    let mut rng = rand::rng();
    for i in 0..sites.len() {
        let j = rng.random_range(0..=i);
        sites.swap(i, j);
    }
}

/// Discovers the site list each epoch and feeds the retriever pool.
pub struct SiteRetriever<I, C: Clock> {
    invoker: Arc<I>,
    governor: BackoffGovernor<C>,
    waiter: Arc<EpochWaiter<C>>,
    shutdown: ShutdownFlag,
    interval: Duration,
}

impl<I: Invoker, C: Clock> SiteRetriever<I, C> {
    pub fn new(
        invoker: Arc<I>,
        governor: BackoffGovernor<C>,
        waiter: Arc<EpochWaiter<C>>,
        shutdown: ShutdownFlag,
        interval: Duration,
    ) -> Self {
        Self {
            invoker,
            governor,
            waiter,
            shutdown,
            interval,
        }
    }

    /// Query instance info. Invocation or decode failure is reported as
    /// indefinitely disabled so the governor throttles this cycle.
    async fn instance_info(&self) -> SiteInfo {
        let disabled_placeholder = SiteInfo {
            multisite: 0,
            siteurl: String::new(),
            disabled: 1,
        };

        let raw = match self.invoker.invoke(&get_info_args()).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(error = %err, "get-info invocation failed");
                return disabled_placeholder;
            }
        };

        match serde_json::from_str::<Vec<SiteInfo>>(&raw) {
            Ok(infos) => match infos.into_iter().next() {
                Some(info) => info,
                None => {
                    tracing::debug!("get-info returned an empty array");
                    disabled_placeholder
                }
            },
            Err(err) => {
                tracing::debug!(error = %err, raw, "get-info decode failed");
                disabled_placeholder
            }
        }
    }

    /// Enumerate the multisite network. Failure yields an empty list for
    /// this cycle; the next epoch retries.
    async fn list_sites(&self) -> Vec<Site> {
        let raw = match self.invoker.invoke(&site_list_args()).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(error = %err, "site list invocation failed");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Site>>(&raw) {
            Ok(sites) => sites,
            Err(err) => {
                tracing::debug!(error = %err, raw, "site list decode failed");
                Vec::new()
            }
        }
    }

    /// One discovery cycle: instance info, back-off, enumeration, shuffle.
    pub(crate) async fn discover(&mut self) -> Vec<Site> {
        let info = self.instance_info().await;
        if !self.governor.should_get_sites(info.disabled).await {
            return Vec::new();
        }

        let mut sites = if info.multisite != 0 {
            self.list_sites().await
        } else {
            vec![Site::new(info.siteurl)]
        };
        shuffle_sites(&mut sites);
        sites
    }

    pub async fn run(mut self, tx: mpsc::Sender<SiteJob>) {
        'cycle: loop {
            if !self.waiter.wait("sites", self.interval).await {
                break;
            }
            if self.shutdown.is_tripped() {
                break;
            }

            let sites = self.discover().await;
            tracing::debug!(count = sites.len(), "discovered sites");

            for site in sites {
                if self.shutdown.is_tripped() {
                    break 'cycle;
                }
                if tx.send(SiteJob::Fetch(site)).await.is_err() {
                    break 'cycle;
                }
            }
        }
        tracing::debug!("site retriever exiting");
    }
}

#[cfg(test)]
#[path = "sites_tests.rs"]
mod tests;
