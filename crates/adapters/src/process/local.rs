// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local process adapter: tokio child processes, signals via nix.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use eb_core::KillPolicy;
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use parking_lot::Mutex;
use tokio::process::{Child, Command};

use super::{tree, LaunchSpec, ProcessAdapter, ProcessError};

/// Launches children on the local host and keeps their handles for reaping.
#[derive(Clone, Default)]
pub struct LocalProcessAdapter {
    children: Arc<Mutex<HashMap<u32, Child>>>,
}

impl LocalProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Liveness without awaiting. Our own children are reaped via `try_wait`;
    /// anything else is looked up in the process table.
    fn alive_now(&self, pid: u32) -> bool {
        let mut children = self.children.lock();
        if let Some(child) = children.get_mut(&pid) {
            return match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    tracing::debug!(pid, %status, "child exited");
                    children.remove(&pid);
                    false
                }
                Err(e) => {
                    tracing::warn!(pid, error = %e, "failed to poll child status");
                    tree::is_running(pid)
                }
            };
        }
        drop(children);
        tree::is_running(pid)
    }

    fn send(pid: u32, sig: Signal) {
        match signal::kill(Pid::from_raw(pid as i32), sig) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => tracing::warn!(pid, signal = %sig, error = %e, "failed to signal process"),
        }
    }
}

#[async_trait]
impl ProcessAdapter for LocalProcessAdapter {
    async fn spawn(&self, spec: LaunchSpec) -> Result<u32, ProcessError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        let child = cmd.spawn().map_err(|e| ProcessError::SpawnFailed {
            program: spec.program.clone(),
            reason: e.to_string(),
        })?;
        let pid = child.id().ok_or_else(|| ProcessError::SpawnFailed {
            program: spec.program.clone(),
            reason: "process exited before its pid could be read".to_string(),
        })?;

        tracing::info!(pid, program = %spec.program.display(), "process spawned");
        self.children.lock().insert(pid, child);
        Ok(pid)
    }

    async fn is_alive(&self, pid: u32) -> bool {
        self.alive_now(pid)
    }

    async fn terminate_tree(&self, pid: u32, policy: &KillPolicy) -> Result<(), ProcessError> {
        let mut targets: BTreeSet<u32> = BTreeSet::new();
        targets.insert(pid);
        let mut round: u32 = 0;

        loop {
            // Scan before signalling: once a parent dies its children are
            // reparented and no longer reachable from the root.
            let table = tree::snapshot();
            let found = tree::descendants(&table, &targets);
            targets.extend(found);
            targets.retain(|p| self.alive_now(*p));
            if targets.is_empty() {
                if round > 0 {
                    tracing::info!(pid, rounds = round, "process tree terminated");
                }
                return Ok(());
            }

            round += 1;
            if policy.max_rounds.is_some_and(|max| round > max) {
                return Err(ProcessError::Unkillable {
                    pid,
                    rounds: round - 1,
                    survivors: targets.into_iter().collect(),
                });
            }

            let sig = if round == 1 { Signal::SIGTERM } else { Signal::SIGKILL };
            tracing::debug!(pid, round, signal = %sig, targets = ?targets, "signalling process tree");
            for &target in &targets {
                Self::send(target, sig);
            }

            let deadline = Instant::now() + policy.grace;
            loop {
                targets.retain(|p| self.alive_now(*p));
                if targets.is_empty() || Instant::now() >= deadline {
                    break;
                }
                tokio::time::sleep(policy.poll).await;
            }
            if !targets.is_empty() {
                tracing::warn!(pid, round, survivors = ?targets, "processes survived termination round");
            }
        }
    }

    async fn capture_output(&self, program: &Path, args: &[&str]) -> Result<String, ProcessError> {
        // Dropping the future (a caller's timeout) kills the helper
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProcessError::CaptureFailed {
                program: program.to_path_buf(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            tracing::debug!(program = %program.display(), status = %output.status, "helper exited non-zero");
        }
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
