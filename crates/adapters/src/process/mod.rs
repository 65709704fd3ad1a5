// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process control adapters
//!
//! The `ProcessAdapter` trait is the seam between the run supervisor and the
//! operating system: launching the emulator, checking whether it is still
//! running, tearing down its whole process tree, and capturing the output of
//! short-lived helper commands.
//!
//! ```text
//! spawn ──> pid ──> is_alive (polled) ──> terminate_tree (SIGTERM, then SIGKILL ...)
//! ```

mod local;
pub mod tree;

pub use local::LocalProcessAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBehavior, FakeProcessAdapter, ProcessCall};

use async_trait::async_trait;
use eb_core::KillPolicy;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from process adapter operations
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("spawn failed for {program}: {reason}")]
    SpawnFailed { program: PathBuf, reason: String },
    #[error("process tree of {pid} survived {rounds} termination rounds (still alive: {survivors:?})")]
    Unkillable { pid: u32, rounds: u32, survivors: Vec<u32> },
    #[error("could not run {program}: {reason}")]
    CaptureFailed { program: PathBuf, reason: String },
}

/// Everything needed to start one child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Added on top of the inherited environment
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), env: Vec::new(), cwd: None }
    }

    eb_core::setters! {
        set {
            args: Vec<String>,
            env: Vec<(String, String)>,
        }
        option {
            cwd: PathBuf,
        }
    }

    /// Look up an environment override by name
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Adapter for launching and supervising child processes
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Start a child process and return its pid.
    async fn spawn(&self, spec: LaunchSpec) -> Result<u32, ProcessError>;

    /// Whether the process is still running.
    ///
    /// Reaps the child if it has exited; zombies count as dead.
    async fn is_alive(&self, pid: u32) -> bool;

    /// Terminate `pid` and every descendant, returning once all are dead.
    ///
    /// Escalates per [`KillPolicy`]. Terminating an already-dead process is
    /// a no-op. Fails only when `policy.max_rounds` is exhausted.
    async fn terminate_tree(&self, pid: u32, policy: &KillPolicy) -> Result<(), ProcessError>;

    /// Run a helper to completion and return its stdout followed by stderr.
    async fn capture_output(&self, program: &Path, args: &[&str]) -> Result<String, ProcessError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
