// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run supervisor: one candidate, one child process tree, one capture.
//!
//! ```text
//! Starting ──(not executable / launch failed)──> Skipped
//!    │
//!    ├─ record version, clear shader cache, spawn
//!    v
//! WarmingUp ── sleep W ──> Capturing ── sleep D-W ──> poll every P:
//!                                                      alive? artifact?
//!                                                      ├─ artifact ──> terminate tree ──> Succeeded
//!                                                      ├─ dead ──────────────────────────> Died
//!                                                      └─ neither ──> sleep P, repeat
//! ```
//!
//! There is no overall timeout: a run that neither dies nor completes is
//! polled forever.

use std::path::{Path, PathBuf};
use std::time::Instant;

use eb_adapters::{LaunchSpec, ProcessAdapter, ProcessError};
use eb_core::product::{shader_cache_dir, SUMMARY_PATTERN};
use eb_core::{BuildId, Candidate, CaptureWindow, Clock, Config, KillPolicy, RunOutcome, RunState};
use glob::Pattern;
use thiserror::Error;

use crate::{cache, overlay, permissions, version};

/// Errors that abort the whole batch
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("could not terminate {build_id}: {source}")]
    Unkillable {
        build_id: BuildId,
        #[source]
        source: ProcessError,
    },
}

/// One supervised execution of a candidate
#[derive(Debug, Clone)]
pub struct RunSession {
    pub build_id: BuildId,
    /// Start-time label, shared by the working dir and the committed record
    pub timestamp: String,
    /// Where the overlay writes for this run
    pub work_dir: PathBuf,
    pub pid: Option<u32>,
    pub started: Option<Instant>,
    state: RunState,
}

impl RunSession {
    /// `{work_root}/{build_id}_{timestamp}`
    pub fn new(candidate: &Candidate, timestamp: impl Into<String>, work_root: &Path) -> Self {
        let timestamp = timestamp.into();
        let work_dir = work_root.join(format!("{}_{}", candidate.build_id, timestamp));
        Self {
            build_id: candidate.build_id.clone(),
            timestamp,
            work_dir,
            pid: None,
            started: None,
            state: RunState::Starting,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        if !self.state.can_transition_to(next) {
            tracing::error!(build_id = %self.build_id, from = %self.state, to = %next, "illegal run transition");
        }
        tracing::debug!(build_id = %self.build_id, from = %self.state, to = %next, "run state");
        self.state = next;
    }
}

/// Drives a run through its state machine
#[derive(Clone)]
pub struct Supervisor<P: ProcessAdapter, C: Clock> {
    process: P,
    clock: C,
    capture: CaptureWindow,
    kill: KillPolicy,
    shader_cache: PathBuf,
}

impl<P: ProcessAdapter, C: Clock> Supervisor<P, C> {
    pub fn new(process: P, clock: C, config: &Config) -> Self {
        Self {
            process,
            clock,
            capture: config.capture,
            kill: config.kill,
            shader_cache: shader_cache_dir(&config.data_dir),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Supervise one run to a terminal state.
    ///
    /// Per-run failures come back as `Ok(Skipped | Died)`; only a process
    /// tree that cannot be killed is an error.
    pub async fn run(
        &self,
        candidate: &Candidate,
        session: &mut RunSession,
    ) -> Result<RunOutcome, SupervisorError> {
        let build_id = candidate.build_id.clone();

        if let Err(e) = permissions::ensure_executable(&candidate.abs_path) {
            return Ok(skip(session, format!("not executable: {}", e)));
        }
        if let Err(e) = tokio::fs::create_dir_all(&session.work_dir).await {
            return Ok(skip(session, format!("cannot create {}: {}", session.work_dir.display(), e)));
        }
        if let Err(e) = version::record_version(&self.process, candidate, &session.work_dir).await {
            tracing::warn!(build_id = %build_id, error = %e, "failed to write version file");
        }

        if let Err(e) = cache::clear_shader_cache(&self.shader_cache) {
            tracing::warn!(dir = %self.shader_cache.display(), error = %e, "failed to clear shader cache");
        }

        let spec = LaunchSpec::new(&candidate.abs_path)
            .env(overlay::overlay_env(&session.work_dir, &self.capture))
            .cwd(candidate.parent_dir());
        let pid = match self.process.spawn(spec).await {
            Ok(pid) => pid,
            Err(e) => return Ok(skip(session, e.to_string())),
        };
        let started = self.clock.now();
        session.pid = Some(pid);
        session.started = Some(started);

        session.transition(RunState::WarmingUp);
        tracing::info!(
            build_id = %build_id,
            pid,
            warmup_s = self.capture.warmup.as_secs(),
            "warming up"
        );
        self.clock.sleep(self.capture.warmup).await;

        session.transition(RunState::Capturing);
        tracing::info!(
            build_id = %build_id,
            pid,
            capture_s = self.capture.active().as_secs(),
            "capturing"
        );
        self.clock.sleep(self.capture.active()).await;

        loop {
            // Liveness first, but a summary already on disk wins over a
            // process that exited in the same instant.
            let alive = self.process.is_alive(pid).await;
            if let Some(artifact) = find_artifact(&session.work_dir) {
                self.terminate(&build_id, pid).await?;
                session.transition(RunState::Succeeded);
                tracing::info!(build_id = %build_id, artifact = %artifact.display(), "capture complete");
                return Ok(RunOutcome::Succeeded { artifact });
            }
            if !alive {
                let elapsed = self.clock.now().duration_since(started);
                self.terminate(&build_id, pid).await?;
                session.transition(RunState::Died);
                tracing::warn!(
                    build_id = %build_id,
                    pid,
                    elapsed = %eb_core::format_elapsed(elapsed),
                    "process exited before the capture completed"
                );
                return Ok(RunOutcome::Died { elapsed });
            }
            self.clock.sleep(self.capture.poll).await;
        }
    }

    async fn terminate(&self, build_id: &BuildId, pid: u32) -> Result<(), SupervisorError> {
        self.process
            .terminate_tree(pid, &self.kill)
            .await
            .map_err(|source| SupervisorError::Unkillable { build_id: build_id.clone(), source })
    }
}

fn skip(session: &mut RunSession, reason: String) -> RunOutcome {
    session.transition(RunState::Skipped);
    tracing::warn!(build_id = %session.build_id, reason = %reason, "skipping run");
    RunOutcome::Skipped { reason }
}

/// First completion artifact in `dir`, by name.
pub fn find_artifact(dir: &Path) -> Option<PathBuf> {
    let pattern = Pattern::new(SUMMARY_PATTERN).ok()?;
    let mut hits: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .filter(|e| e.file_name().to_str().is_some_and(|n| pattern.matches(n)))
        .map(|e| e.path())
        .collect();
    hits.sort();
    hits.into_iter().next()
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
