// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use relay_core::SystemClock;

struct Fixture {
    shutdown: ShutdownFlag,
    counters: Arc<HeartbeatCounters>,
    get_liveness: Arc<Liveness>,
    run_liveness: Arc<Liveness>,
    sites_rx: mpsc::Receiver<SiteJob>,
    events_rx: mpsc::Receiver<EventJob>,
    controller: HeartbeatController<SystemClock>,
}

fn fixture(interval: Duration, get_workers: usize, run_workers: usize) -> Fixture {
    let shutdown = ShutdownFlag::new();
    let counters = Arc::new(HeartbeatCounters::new());
    let get_liveness = Arc::new(Liveness::new(get_workers));
    let run_liveness = Arc::new(Liveness::new(run_workers));
    let (sites_tx, sites_rx) = mpsc::channel(16);
    let (events_tx, events_rx) = mpsc::channel(16);

    let controller = HeartbeatController::new(
        shutdown.clone(),
        Arc::new(EpochWaiter::new(SystemClock, shutdown.clone())),
        Arc::clone(&counters),
        interval,
        Arc::clone(&get_liveness),
        Arc::clone(&run_liveness),
        sites_tx,
        events_tx,
        Duration::from_millis(20),
    );

    Fixture {
        shutdown,
        counters,
        get_liveness,
        run_liveness,
        sites_rx,
        events_rx,
        controller,
    }
}

#[tokio::test]
async fn drain_returns_once_both_registries_clear() {
    let mut fx = fixture(Duration::from_secs(60), 1, 2);
    fx.get_liveness.enter(0);
    fx.run_liveness.enter(0);
    fx.run_liveness.enter(1);

    let get_liveness = Arc::clone(&fx.get_liveness);
    let run_liveness = Arc::clone(&fx.run_liveness);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        get_liveness.exit(0);
        run_liveness.exit(0);
        run_liveness.exit(1);
    });

    tokio::time::timeout(Duration::from_secs(2), fx.controller.drain())
        .await
        .unwrap();

    // One sentinel per live worker per poll while they were live.
    assert!(matches!(fx.sites_rx.try_recv(), Ok(SiteJob::Drain)));
    assert!(matches!(fx.events_rx.try_recv(), Ok(EventJob::Drain)));
    assert!(matches!(fx.events_rx.try_recv(), Ok(EventJob::Drain)));
}

#[tokio::test]
async fn drain_is_immediate_when_pools_already_exited() {
    let fx = fixture(Duration::from_secs(60), 3, 5);
    tokio::time::timeout(Duration::from_millis(500), fx.controller.drain())
        .await
        .unwrap();
}

#[tokio::test]
async fn heartbeat_epoch_consumes_counters() {
    let fx = fixture(Duration::from_secs(1), 0, 0);
    fx.counters.record_success();
    fx.counters.record_success();
    fx.counters.record_error();

    let shutdown = fx.shutdown.clone();
    let counters = Arc::clone(&fx.counters);
    let handle = tokio::spawn(fx.controller.run());

    // One heartbeat epoch (1 s period waits at most ~3 s) must pass
    // before the counters are consumed.
    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(counters.take(), (0, 0));

    shutdown.trip();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn shutdown_drains_even_with_heartbeat_disabled() {
    let fx = fixture(Duration::ZERO, 0, 0);
    fx.shutdown.trip();

    // The 60-second monitor wait observes the flag and falls through to
    // an immediate drain.
    tokio::time::timeout(Duration::from_secs(5), fx.controller.run())
        .await
        .unwrap();
}
