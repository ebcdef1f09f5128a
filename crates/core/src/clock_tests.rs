// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn system_clock_epoch_units_agree() {
    let clock = SystemClock;
    let ns = clock.epoch_ns();
    let secs = clock.epoch_secs();
    assert!(secs >= ns / 1_000_000_000);
    // A plausible wall clock: later than 2020-01-01.
    assert!(secs > 1_577_836_800);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    let ns1 = clock.epoch_ns();
    clock.advance(Duration::from_secs(60));
    let t2 = clock.now();
    assert!(t2.duration_since(t1) >= Duration::from_secs(60));
    assert_eq!(clock.epoch_ns() - ns1, 60_000_000_000);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    clock2.advance(Duration::from_secs(30));
    assert_eq!(clock1.epoch_ns(), clock2.epoch_ns());
}

#[test]
fn fake_clock_set_epoch_secs() {
    let clock = FakeClock::new();
    clock.set_epoch_secs(1000);
    assert_eq!(clock.epoch_secs(), 1000);
    assert_eq!(clock.epoch_ms(), 1_000_000);
    assert_eq!(clock.epoch_ns(), 1_000_000_000_000);
}

#[test]
fn fake_clock_set() {
    let clock = FakeClock::new();
    let future = Instant::now() + Duration::from_secs(3600);
    clock.set(future);
    assert!(clock.now() >= future);
}
