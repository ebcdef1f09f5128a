// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase-aligned periodic waiter with per-label random jitter.
//!
//! Each label gets a one-time random offset in `[0, period)`; every wait
//! then lands on a wall-clock instant congruent to that offset modulo the
//! period. Identical runner fleets therefore drift apart instead of
//! hammering the upstream in lockstep.

use parking_lot::Mutex;
use rand::Rng;
use relay_core::{Clock, ShutdownFlag};
use std::collections::HashMap;
use std::time::Duration;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Longest single sleep slice; shutdown is re-checked between slices.
const MAX_SLICE: Duration = Duration::from_secs(3);

pub struct EpochWaiter<C: Clock> {
    clock: C,
    shutdown: ShutdownFlag,
    offsets: Mutex<HashMap<String, u64>>,
    slice: Duration,
}

impl<C: Clock> EpochWaiter<C> {
    pub fn new(clock: C, shutdown: ShutdownFlag) -> Self {
        Self {
            clock,
            shutdown,
            offsets: Mutex::new(HashMap::new()),
            slice: MAX_SLICE,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_slice(mut self, slice: Duration) -> Self {
        self.slice = slice;
        self
    }

    /// The fixed jitter offset for `label`, drawn on first use.
    fn offset_ns(&self, label: &str, period_ns: u64) -> u64 {
        *self
            .offsets
            .lock()
            .entry(label.to_string())
            .or_insert_with(|| rand::rng().random_range(0..period_ns))
    }

    /// Nanoseconds until the next epoch boundary: the soonest instant at
    /// least one second away whose wall-clock value is congruent to
    /// `offset_ns` modulo `period_ns`.
    fn target_delay_ns(now_ns: u64, period_ns: u64, offset_ns: u64) -> u64 {
        let mut delta = period_ns - now_ns % period_ns;
        if delta < NANOS_PER_SEC {
            delta += period_ns;
        }
        delta + offset_ns
    }

    /// Block until the next aligned epoch boundary for `label`.
    ///
    /// Returns false when the wait was cut short by shutdown. A watchdog
    /// abandons the wait (returning true, the epoch forfeited) once more
    /// than twice the period has elapsed since the wait began, guarding
    /// against wall-clock anomalies.
    pub async fn wait(&self, label: &str, period: Duration) -> bool {
        let period_ns = period.as_nanos() as u64;
        if period_ns == 0 {
            return !self.shutdown.is_tripped();
        }

        let offset = self.offset_ns(label, period_ns);
        let start_ns = self.clock.epoch_ns();
        let delay_ns = Self::target_delay_ns(start_ns, period_ns, offset);
        let target_ns = start_ns + delay_ns;
        let started = self.clock.now();
        let watchdog = period * 2;

        loop {
            if self.shutdown.is_tripped() {
                return false;
            }
            let now_ns = self.clock.epoch_ns();
            if now_ns >= target_ns {
                return true;
            }
            if self.clock.now().duration_since(started) > watchdog {
                tracing::warn!(
                    label,
                    period_secs = period.as_secs(),
                    "epoch wait exceeded twice its period, abandoning this epoch"
                );
                return true;
            }
            let remaining = Duration::from_nanos(target_ns - now_ns);
            tokio::time::sleep(remaining.min(self.slice)).await;
        }
    }
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;
