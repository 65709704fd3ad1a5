// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable run configuration, built once at startup and passed by
//! reference into every component.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Errors building a [`Config`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("warm-up ({warmup}s) must be shorter than the capture duration ({duration}s)")]
    WarmupTooLong { warmup: u64, duration: u64 },
    #[error("capture duration must be at least one second")]
    ZeroDuration,
    #[error("poll period must be non-zero")]
    ZeroPoll,
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
    #[error("unknown outlier filter {0:?} (expected \"percent\" or \"iqr\")")]
    UnknownFilter(String),
    #[error("aggregator command is empty")]
    EmptyAggregator,
    #[error("could not determine the user data directory")]
    NoDataDir,
}

/// Timing of one capture: total bound `duration`, of which the first
/// `warmup` is not recorded; `poll` is the completion-check period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureWindow {
    pub duration: Duration,
    pub warmup: Duration,
    pub poll: Duration,
}

impl CaptureWindow {
    pub fn new(duration: Duration, warmup: Duration, poll: Duration) -> Result<Self, ConfigError> {
        if duration.as_secs() == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if warmup >= duration {
            return Err(ConfigError::WarmupTooLong {
                warmup: warmup.as_secs(),
                duration: duration.as_secs(),
            });
        }
        if poll.is_zero() {
            return Err(ConfigError::ZeroPoll);
        }
        Ok(Self { duration, warmup, poll })
    }

    /// Time the logger actually records (`duration - warmup`)
    pub fn active(&self) -> Duration {
        self.duration.saturating_sub(self.warmup)
    }
}

impl Default for CaptureWindow {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(65),
            warmup: Duration::from_secs(5),
            poll: Duration::from_secs(1),
        }
    }
}

/// Escalating termination policy for a finished run's process tree.
///
/// Round 1 sends SIGTERM, later rounds SIGKILL; each round waits up to
/// `grace` for every target to exit. `max_rounds = None` retries forever:
/// a surviving process would skew the next build's measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KillPolicy {
    pub grace: Duration,
    pub poll: Duration,
    pub max_rounds: Option<u32>,
}

impl Default for KillPolicy {
    fn default() -> Self {
        Self { grace: Duration::from_secs(3), poll: Duration::from_millis(100), max_rounds: None }
    }
}

/// Outlier filtering requested from the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierFilter {
    Percent,
    Iqr,
}

impl OutlierFilter {
    pub fn flag(&self) -> &'static str {
        match self {
            OutlierFilter::Percent => "--filter-percent",
            OutlierFilter::Iqr => "--filter-iqr",
        }
    }
}

impl FromStr for OutlierFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" => Ok(OutlierFilter::Percent),
            "iqr" => Ok(OutlierFilter::Iqr),
            other => Err(ConfigError::UnknownFilter(other.to_string())),
        }
    }
}

/// External comparison tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatorCommand {
    pub program: String,
    pub args: Vec<String>,
    pub filter: Option<OutlierFilter>,
}

impl AggregatorCommand {
    /// Split a whitespace-separated command line (`python3 compare_logs.py`).
    pub fn parse(command: &str) -> Result<Self, ConfigError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ConfigError::EmptyAggregator)?;
        Ok(Self { program, args: parts.collect(), filter: None })
    }
}

impl Default for AggregatorCommand {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["tools/test/compare_logs.py".to_string()],
            filter: None,
        }
    }
}

/// Where the aggregator's stdout is sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregatorStdout {
    #[default]
    Inherit,
    /// Keeps stdout free for a machine-readable report
    Stderr,
}

/// A directory scanned during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRoot {
    pub dir: PathBuf,
    pub is_reference: bool,
}

/// Run configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Primary build tree
    pub build_dir: PathBuf,
    /// Downloaded/packaged builds
    pub artifacts_dir: PathBuf,
    /// Name of the reference subtree inside each tree
    pub reference_subdir: String,
    /// Case-insensitive globs a candidate's file name must match
    pub patterns: Vec<String>,
    /// Root of the committed Log Record tree
    pub log_dir: PathBuf,
    /// Parent of in-flight working directories
    pub work_dir: PathBuf,
    /// User data directory containing the emulator's `eden/` folder
    pub data_dir: PathBuf,
    pub capture: CaptureWindow,
    pub kill: KillPolicy,
    /// Overlay logger binary that must be installed
    pub overlay_tool: String,
    pub aggregator: AggregatorCommand,
    pub aggregator_stdout: AggregatorStdout,
}

impl Config {
    /// Configuration with default locations under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: PathBuf::from("build/bin"),
            artifacts_dir: PathBuf::from("artifacts"),
            reference_subdir: "reference".to_string(),
            patterns: vec!["*.AppImage".to_string(), format!("{}*", crate::PRODUCT_NAME)],
            log_dir: PathBuf::from("benchmark-logs"),
            work_dir: std::env::temp_dir().join("eden-bench"),
            data_dir: data_dir.into(),
            capture: CaptureWindow::default(),
            kill: KillPolicy::default(),
            overlay_tool: "mangohud".to_string(),
            aggregator: AggregatorCommand::default(),
            aggregator_stdout: AggregatorStdout::Inherit,
        }
    }

    crate::setters! {
        into {
            build_dir: PathBuf,
            artifacts_dir: PathBuf,
            reference_subdir: String,
            log_dir: PathBuf,
            work_dir: PathBuf,
            overlay_tool: String,
        }
        set {
            patterns: Vec<String>,
            capture: CaptureWindow,
            kill: KillPolicy,
            aggregator: AggregatorCommand,
            aggregator_stdout: AggregatorStdout,
        }
    }

    /// Directories to scan, in order: each tree, then its reference subtree.
    pub fn discovery_roots(&self) -> Vec<DiscoveryRoot> {
        [&self.build_dir, &self.artifacts_dir]
            .into_iter()
            .flat_map(|tree| {
                [
                    DiscoveryRoot { dir: tree.clone(), is_reference: false },
                    DiscoveryRoot { dir: tree.join(&self.reference_subdir), is_reference: true },
                ]
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
