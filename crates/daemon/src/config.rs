// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner configuration, read once at startup and immutable thereafter.

use crate::engine::EngineSettings;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cli path does not exist: {0}")]
    CliMissing(String),
    #[error("wp path does not exist: {0}")]
    WpMissing(String),
}

/// Command-line configuration for relayd.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "relayd",
    version,
    about = "Cron event runner for hosted sites"
)]
pub struct Config {
    /// Absolute path to the external tool binary
    #[arg(long, default_value = "/usr/local/bin/wp")]
    pub cli: PathBuf,

    /// Network id, appended as --network=<n> to every invocation when
    /// greater than zero
    #[arg(long, default_value_t = 0)]
    pub network: u64,

    /// Installation path, passed as --path=<p> to every invocation
    #[arg(long, default_value = "/var/www/html")]
    pub wp: PathBuf,

    /// Size of the event retriever pool
    #[arg(long = "workers-get", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub workers_get: u64,

    /// Size of the event worker pool
    #[arg(long = "workers-run", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub workers_run: u64,

    /// Seconds between site-discovery cycles
    #[arg(long = "get-events-interval", default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub get_events_interval: u64,

    /// Seconds between heartbeat lines; 0 disables emission but keeps
    /// shutdown monitoring
    #[arg(long, default_value_t = 60)]
    pub heartbeat: u64,

    /// Log destination; standard output when omitted
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Emit per-site and per-event trace lines
    #[arg(long)]
    pub debug: bool,
}

impl Config {
    /// Check the paths that must exist before the runner starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cli.exists() {
            return Err(ConfigError::CliMissing(self.cli.display().to_string()));
        }
        if !self.wp.exists() {
            return Err(ConfigError::WpMissing(self.wp.display().to_string()));
        }
        Ok(())
    }

    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            workers_get: self.workers_get as usize,
            workers_run: self.workers_run as usize,
            get_events_interval: Duration::from_secs(self.get_events_interval),
            heartbeat: Duration::from_secs(self.heartbeat),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
