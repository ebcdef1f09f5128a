// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! relayd: cron event runner for hosted sites.
//!
//! Discovers due scheduled events for one or many sites each epoch and
//! dispatches them to the external tool through a bounded pipeline.

use clap::{CommandFactory, Parser};
use relay_adapters::WpCli;
use relay_core::{ShutdownFlag, SystemClock};
use relay_daemon::config::Config;
use relay_daemon::engine::signal;
use relay_daemon::{logging, Engine};
use std::sync::Arc;

/// Exit code for startup validation failures.
const EXIT_USAGE: i32 = 3;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    if let Err(err) = config.validate() {
        eprintln!("error: {err}");
        eprintln!();
        let _ = Config::command().print_help();
        std::process::exit(EXIT_USAGE);
    }

    let _log_guard = match logging::init(config.log.as_deref(), config.debug) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: failed to open log destination: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        cli = %config.cli.display(),
        wp = %config.wp.display(),
        network = config.network,
        workers_get = config.workers_get,
        workers_run = config.workers_run,
        get_events_interval = config.get_events_interval,
        heartbeat = config.heartbeat,
        "starting cron event runner"
    );

    let shutdown = ShutdownFlag::new();
    tokio::spawn(signal::listen(shutdown.clone()));

    let invoker = Arc::new(WpCli::new(
        config.cli.clone(),
        config.wp.clone(),
        config.network,
    ));
    let engine = Engine::new(invoker, SystemClock, shutdown, config.settings());
    engine.run().await;

    tracing::info!("clean drain complete, exiting");
}
