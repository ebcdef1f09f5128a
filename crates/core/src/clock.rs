// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_ns(&self) -> u64;

    fn epoch_ms(&self) -> u64 {
        self.epoch_ns() / 1_000_000
    }

    fn epoch_secs(&self) -> u64 {
        self.epoch_ns() / 1_000_000_000
    }
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ns(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    epoch_ns: Arc<Mutex<u64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            epoch_ns: Arc::new(Mutex::new(1_000_000_000_000)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
        *self.epoch_ns.lock() += duration.as_nanos() as u64;
    }

    /// Set the clock to a specific instant
    pub fn set(&self, instant: Instant) {
        *self.current.lock() = instant;
    }

    /// Set the epoch nanoseconds value
    pub fn set_epoch_ns(&self, ns: u64) {
        *self.epoch_ns.lock() = ns;
    }

    /// Set the epoch value in whole seconds
    pub fn set_epoch_secs(&self, secs: u64) {
        *self.epoch_ns.lock() = secs * 1_000_000_000;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn epoch_ns(&self) -> u64 {
        *self.epoch_ns.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
