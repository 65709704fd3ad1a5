// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handoff of the committed Log Record tree to the external aggregator.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use eb_core::{AggregatorCommand, AggregatorStdout};
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("failed to launch aggregator {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// How the aggregator exited. Its status is reported, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandoffResult {
    pub log_root: PathBuf,
    /// `None` when terminated by a signal
    pub exit_code: Option<i32>,
}

impl HandoffResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Argument vector passed to the aggregator program.
pub fn arguments(command: &AggregatorCommand, log_root: &Path) -> Vec<String> {
    let mut args = command.args.clone();
    args.push(log_root.display().to_string());
    if let Some(filter) = command.filter {
        args.push(filter.flag().to_string());
    }
    args
}

/// Run the aggregator over `log_root` and wait for it. Stderr is inherited;
/// stdout is inherited or folded into stderr.
pub async fn invoke(
    command: &AggregatorCommand,
    log_root: &Path,
    stdout: AggregatorStdout,
) -> Result<HandoffResult, HandoffError> {
    let args = arguments(command, log_root);
    tracing::info!(program = %command.program, args = ?args, "handing off to aggregator");

    let stdout = match stdout {
        AggregatorStdout::Inherit => Stdio::inherit(),
        AggregatorStdout::Stderr => Stdio::from(std::io::stderr()),
    };
    let status = Command::new(&command.program)
        .args(&args)
        .stdout(stdout)
        .status()
        .await
        .map_err(|source| HandoffError::Launch { program: command.program.clone(), source })?;

    let result = HandoffResult { log_root: log_root.to_path_buf(), exit_code: status.code() };
    if result.success() {
        tracing::info!("aggregator finished");
    } else {
        tracing::warn!(exit_code = ?result.exit_code, "aggregator exited unsuccessfully");
    }
    Ok(result)
}

#[cfg(test)]
#[path = "handoff_tests.rs"]
mod tests;
