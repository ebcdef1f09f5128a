// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Escalating back-off while the upstream declares automation disabled.

use relay_core::{Clock, ShutdownFlag};
use std::time::Duration;

/// Escalation step per consecutive disabled observation.
const BACKOFF_STEP: Duration = Duration::from_secs(3 * 60);

/// Escalation stops once a computed sleep crosses this bound; the counter
/// resets on that cycle.
const BACKOFF_CEILING: Duration = Duration::from_secs(60 * 60);

/// Longest uninterrupted sleep slice; shutdown is re-checked between
/// slices so a back-off never stalls the drain.
const SLEEP_SLICE: Duration = Duration::from_secs(3);

/// Throttles site discovery while the upstream reports `disabled != 0`.
pub struct BackoffGovernor<C: Clock> {
    clock: C,
    shutdown: ShutdownFlag,
    disabled_loops: u32,
    slice: Duration,
}

impl<C: Clock> BackoffGovernor<C> {
    pub fn new(clock: C, shutdown: ShutdownFlag) -> Self {
        Self {
            clock,
            shutdown,
            disabled_loops: 0,
            slice: SLEEP_SLICE,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_slice(mut self, slice: Duration) -> Self {
        self.slice = slice;
        self
    }

    #[cfg(test)]
    pub(crate) fn loops(&self) -> u32 {
        self.disabled_loops
    }

    /// Decide the throttle sleep for one observation of `disabled`.
    ///
    /// `None` means automation is enabled and discovery may proceed.
    /// `disabled == 1` escalates indefinitely; `disabled > 1` is a unix
    /// timestamp after which the upstream re-enables itself, so the
    /// counter resets once the stated expiry is within one sleep away.
    fn next_sleep(&mut self, disabled: i64) -> Option<Duration> {
        if disabled <= 0 {
            self.disabled_loops = 0;
            return None;
        }

        let sleep = BACKOFF_STEP * self.disabled_loops;
        if disabled == 1 {
            if sleep > BACKOFF_CEILING {
                self.disabled_loops = 0;
            } else {
                self.disabled_loops += 1;
            }
        } else {
            let until = disabled as u64;
            if self.clock.epoch_secs() + sleep.as_secs() >= until {
                self.disabled_loops = 0;
            } else {
                self.disabled_loops += 1;
            }
        }
        Some(sleep)
    }

    /// Apply the back-off policy for this cycle; true means site
    /// discovery may proceed.
    pub async fn should_get_sites(&mut self, disabled: i64) -> bool {
        match self.next_sleep(disabled) {
            None => true,
            Some(sleep) => {
                if !sleep.is_zero() {
                    tracing::info!(
                        disabled,
                        sleep_secs = sleep.as_secs(),
                        "automation disabled, backing off"
                    );
                }
                self.sleep_interruptibly(sleep).await;
                false
            }
        }
    }

    async fn sleep_interruptibly(&self, total: Duration) {
        let deadline = self.clock.now() + total;
        loop {
            if self.shutdown.is_tripped() {
                return;
            }
            let now = self.clock.now();
            if now >= deadline {
                return;
            }
            tokio::time::sleep((deadline - now).min(self.slice)).await;
        }
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
