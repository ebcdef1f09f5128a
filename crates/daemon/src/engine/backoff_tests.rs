// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use relay_core::FakeClock;
use std::time::Instant;

fn governor() -> BackoffGovernor<FakeClock> {
    BackoffGovernor::new(FakeClock::new(), ShutdownFlag::new())
}

#[test]
fn enabled_resets_counter_and_permits_discovery() {
    let mut governor = governor();
    assert_eq!(governor.next_sleep(1), Some(Duration::ZERO));
    assert_eq!(governor.loops(), 1);

    assert_eq!(governor.next_sleep(0), None);
    assert_eq!(governor.loops(), 0);
}

#[test]
fn indefinite_disable_escalates_in_three_minute_steps() {
    let mut governor = governor();
    let sleeps: Vec<u64> = (0..10)
        .filter_map(|_| governor.next_sleep(1))
        .map(|d| d.as_secs())
        .collect();
    assert_eq!(
        sleeps,
        vec![0, 180, 360, 540, 720, 900, 1080, 1260, 1440, 1620]
    );
    assert_eq!(governor.loops(), 10);
}

#[test]
fn escalation_resets_after_the_first_sleep_beyond_one_hour() {
    let mut governor = governor();
    let sleeps: Vec<u64> = (0..23)
        .filter_map(|_| governor.next_sleep(1))
        .map(|d| d.as_secs())
        .collect();
    // 180 * 20 = 3600 is not beyond the ceiling, so the counter still
    // escalates; the 63-minute sleep is, and the next cycle starts over.
    assert_eq!(sleeps[20], 3600);
    assert_eq!(sleeps[21], 3780);
    assert_eq!(sleeps[22], 0);
}

#[test]
fn disabled_until_past_timestamp_resets_immediately() {
    let clock = FakeClock::new();
    clock.set_epoch_secs(1000);
    let mut governor = BackoffGovernor::new(clock, ShutdownFlag::new());

    assert_eq!(governor.next_sleep(100), Some(Duration::ZERO));
    assert_eq!(governor.loops(), 0);
}

#[test]
fn disabled_until_far_future_escalates() {
    let clock = FakeClock::new();
    clock.set_epoch_secs(1000);
    let mut governor = BackoffGovernor::new(clock, ShutdownFlag::new());

    let far = 1000 + 86_400;
    assert_eq!(governor.next_sleep(far), Some(Duration::ZERO));
    assert_eq!(governor.loops(), 1);
    assert_eq!(governor.next_sleep(far), Some(Duration::from_secs(180)));
    assert_eq!(governor.loops(), 2);
}

#[test]
fn disabled_until_imminent_expiry_resets() {
    let clock = FakeClock::new();
    clock.set_epoch_secs(1000);
    let mut governor = BackoffGovernor::new(clock, ShutdownFlag::new());
    governor.disabled_loops = 2;

    // now + 360 reaches the stated expiry, so stop escalating.
    assert_eq!(governor.next_sleep(1300), Some(Duration::from_secs(360)));
    assert_eq!(governor.loops(), 0);
}

#[tokio::test]
async fn zero_sleep_returns_false_without_blocking() {
    let mut governor =
        BackoffGovernor::new(relay_core::SystemClock, ShutdownFlag::new());
    let started = Instant::now();
    assert!(!governor.should_get_sites(1).await);
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn shutdown_interrupts_backoff_sleep() {
    let shutdown = ShutdownFlag::new();
    let mut governor = BackoffGovernor::new(relay_core::SystemClock, shutdown.clone())
        .with_slice(Duration::from_millis(10));
    governor.disabled_loops = 5;

    let started = Instant::now();
    let handle = tokio::spawn(async move { governor.should_get_sites(1).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.trip();

    let proceed = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(!proceed);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn enabled_proceeds_without_sleeping() {
    let mut governor =
        BackoffGovernor::new(relay_core::SystemClock, ShutdownFlag::new());
    assert!(governor.should_get_sites(0).await);
}
