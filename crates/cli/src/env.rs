// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.
//!
//! Every setting is read once here and frozen into a [`Config`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use eb_core::{AggregatorCommand, CaptureWindow, Config, ConfigError, KillPolicy, OutlierFilter};

pub const BUILD_DIR: &str = "EDEN_BUILD_DIR";
pub const ARTIFACTS_DIR: &str = "EDEN_ARTIFACTS_DIR";
pub const REFERENCE_SUBDIR: &str = "EDEN_BENCH_REFERENCE_SUBDIR";
pub const LOG_DIR: &str = "EDEN_BENCH_LOG_DIR";
pub const WORK_DIR: &str = "EDEN_BENCH_WORK_DIR";
pub const DATA_DIR: &str = "EDEN_BENCH_DATA_DIR";
pub const DURATION: &str = "EDEN_BENCH_DURATION";
pub const WARMUP: &str = "EDEN_BENCH_WARMUP";
pub const POLL_MS: &str = "EDEN_BENCH_POLL_MS";
pub const KILL_RETRIES: &str = "EDEN_BENCH_KILL_RETRIES";
pub const OVERLAY: &str = "EDEN_BENCH_OVERLAY";
pub const AGGREGATOR: &str = "EDEN_BENCH_AGGREGATOR";
pub const FILTER: &str = "EDEN_BENCH_FILTER";
/// Tracing filter directive (default `info`)
pub const LOG: &str = "EDEN_BENCH_LOG";

/// Set, non-empty value of `var`.
fn var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

fn parsed<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: name.to_string(),
                value: value.clone(),
            })
        })
        .transpose()
}

/// User data dir: EDEN_BENCH_DATA_DIR > platform data dir
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    var(DATA_DIR).map(PathBuf::from).or_else(dirs::data_dir).ok_or(ConfigError::NoDataDir)
}

/// Filter directive for the diagnostics subscriber
pub fn log_filter() -> String {
    var(LOG).unwrap_or_else(|| "info".to_string())
}

pub fn capture_window() -> Result<CaptureWindow, ConfigError> {
    let defaults = CaptureWindow::default();
    let duration = parsed::<u64>(DURATION)?.map(Duration::from_secs).unwrap_or(defaults.duration);
    let warmup = parsed::<u64>(WARMUP)?.map(Duration::from_secs).unwrap_or(defaults.warmup);
    let poll = parsed::<u64>(POLL_MS)?.map(Duration::from_millis).unwrap_or(defaults.poll);
    CaptureWindow::new(duration, warmup, poll)
}

/// Termination policy; the round bound must be at least one.
pub fn kill_policy() -> Result<KillPolicy, ConfigError> {
    let max_rounds = match parsed::<u32>(KILL_RETRIES)? {
        Some(0) => {
            return Err(ConfigError::InvalidValue {
                var: KILL_RETRIES.to_string(),
                value: "0".to_string(),
            })
        }
        rounds => rounds,
    };
    Ok(KillPolicy { max_rounds, ..KillPolicy::default() })
}

pub fn aggregator() -> Result<AggregatorCommand, ConfigError> {
    let mut command = match var(AGGREGATOR) {
        Some(line) => AggregatorCommand::parse(&line)?,
        None => AggregatorCommand::default(),
    };
    command.filter = var(FILTER).map(|f| OutlierFilter::from_str(&f)).transpose()?;
    Ok(command)
}

/// Build the run configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    let mut config = Config::new(data_dir()?)
        .capture(capture_window()?)
        .kill(kill_policy()?)
        .aggregator(aggregator()?);

    if let Some(dir) = var(BUILD_DIR) {
        config = config.build_dir(dir);
    }
    if let Some(dir) = var(ARTIFACTS_DIR) {
        config = config.artifacts_dir(dir);
    }
    if let Some(name) = var(REFERENCE_SUBDIR) {
        config = config.reference_subdir(name);
    }
    if let Some(dir) = var(LOG_DIR) {
        config = config.log_dir(dir);
    }
    if let Some(dir) = var(WORK_DIR) {
        config = config.work_dir(dir);
    }
    if let Some(tool) = var(OVERLAY) {
        config = config.overlay_tool(tool);
    }
    Ok(config)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
