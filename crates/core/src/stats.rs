// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-period success/error accumulators reported by the heartbeat.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters mutated by run workers and reset by the
/// heartbeat emitter.
///
/// Increments racing a `take` may land in the following period; the
/// heartbeat contract only requires that nothing is counted twice.
#[derive(Debug, Default)]
pub struct HeartbeatCounters {
    succeeded: AtomicU64,
    errored: AtomicU64,
}

impl HeartbeatCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errored.fetch_add(1, Ordering::Relaxed);
    }

    /// Read and reset both counters, returning `(succeeded, errored)`.
    pub fn take(&self) -> (u64, u64) {
        (
            self.succeeded.swap(0, Ordering::Relaxed),
            self.errored.swap(0, Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
