// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse(args: &[&str]) -> Config {
    let mut argv = vec!["relayd"];
    argv.extend_from_slice(args);
    Config::try_parse_from(argv).unwrap()
}

#[test]
fn defaults_match_contract() {
    let config = parse(&[]);
    assert_eq!(config.cli, PathBuf::from("/usr/local/bin/wp"));
    assert_eq!(config.network, 0);
    assert_eq!(config.wp, PathBuf::from("/var/www/html"));
    assert_eq!(config.workers_get, 1);
    assert_eq!(config.workers_run, 5);
    assert_eq!(config.get_events_interval, 60);
    assert_eq!(config.heartbeat, 60);
    assert!(config.log.is_none());
    assert!(!config.debug);
}

#[test]
fn flags_override_defaults() {
    let config = parse(&[
        "--cli",
        "/bin/echo",
        "--wp",
        "/tmp",
        "--network",
        "2",
        "--workers-get",
        "3",
        "--workers-run",
        "8",
        "--get-events-interval",
        "30",
        "--heartbeat",
        "0",
        "--log",
        "/var/log/relayd.log",
        "--debug",
    ]);
    assert_eq!(config.cli, PathBuf::from("/bin/echo"));
    assert_eq!(config.network, 2);
    assert_eq!(config.workers_get, 3);
    assert_eq!(config.workers_run, 8);
    assert_eq!(config.get_events_interval, 30);
    assert_eq!(config.heartbeat, 0);
    assert_eq!(config.log, Some(PathBuf::from("/var/log/relayd.log")));
    assert!(config.debug);
}

#[test]
fn zero_worker_pools_are_rejected() {
    let result = Config::try_parse_from(["relayd", "--workers-run", "0"]);
    assert!(result.is_err());
}

#[test]
fn zero_discovery_interval_is_rejected() {
    let result = Config::try_parse_from(["relayd", "--get-events-interval", "0"]);
    assert!(result.is_err());
}

#[test]
fn validate_accepts_existing_paths() {
    let config = parse(&["--cli", "/bin/echo", "--wp", "/tmp"]);
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_missing_cli() {
    let config = parse(&["--cli", "/nonexistent/wp", "--wp", "/tmp"]);
    assert!(matches!(config.validate(), Err(ConfigError::CliMissing(_))));
}

#[test]
fn validate_rejects_missing_wp_path() {
    let config = parse(&["--cli", "/bin/echo", "--wp", "/nonexistent/html"]);
    assert!(matches!(config.validate(), Err(ConfigError::WpMissing(_))));
}

#[test]
fn settings_convert_seconds_to_durations() {
    let config = parse(&["--get-events-interval", "15", "--heartbeat", "5"]);
    let settings = config.settings();
    assert_eq!(settings.get_events_interval, Duration::from_secs(15));
    assert_eq!(settings.heartbeat, Duration::from_secs(5));
    assert_eq!(settings.workers_get, 1);
    assert_eq!(settings.workers_run, 5);
}
