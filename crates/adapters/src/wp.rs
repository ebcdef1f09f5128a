// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wp-cli invoker: spawns the configured tool and returns merged output.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

/// Errors from invoking the external tool.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to spawn {cli}: {source}")]
    Spawn {
        cli: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command exited with code {code}: {output}")]
    CommandFailed { code: i32, output: String },
}

/// Seam for the external command-line tool.
///
/// Implementations return the merged stdout+stderr text; the output is
/// opaque at this layer and callers that expect JSON decode it themselves.
#[async_trait]
pub trait Invoker: Send + Sync + 'static {
    async fn invoke(&self, args: &[String]) -> Result<String, InvokeError>;
}

/// The real wp-cli binary.
///
/// Every call gets the fixed trailing arguments appended: `--allow-root`,
/// `--quiet`, `--path=<wp_path>`, and `--network=<n>` when a network id is
/// configured.
#[derive(Debug, Clone)]
pub struct WpCli {
    cli: PathBuf,
    wp_path: PathBuf,
    network: u64,
}

impl WpCli {
    pub fn new(cli: PathBuf, wp_path: PathBuf, network: u64) -> Self {
        Self {
            cli,
            wp_path,
            network,
        }
    }

    fn trailing_args(&self) -> Vec<String> {
        let mut args = vec![
            "--allow-root".to_string(),
            "--quiet".to_string(),
            format!("--path={}", self.wp_path.display()),
        ];
        if self.network > 0 {
            args.push(format!("--network={}", self.network));
        }
        args
    }
}

#[async_trait]
impl Invoker for WpCli {
    async fn invoke(&self, args: &[String]) -> Result<String, InvokeError> {
        tracing::trace!(?args, "invoking external tool");

        let output = Command::new(&self.cli)
            .args(args)
            .args(self.trailing_args())
            .output()
            .await
            .map_err(|source| InvokeError::Spawn {
                cli: self.cli.display().to_string(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            Err(InvokeError::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                output: combined,
            })
        }
    }
}

#[cfg(test)]
#[path = "wp_tests.rs"]
mod tests;
