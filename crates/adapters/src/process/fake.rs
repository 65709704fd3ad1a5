// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process adapter for supervisor tests.
//!
//! Processes are scripted with a [`FakeBehavior`] and advance on a shared
//! [`FakeClock`]: a process "dies" once its lifetime has elapsed and "writes"
//! its completion artifact the first time it is polled after the artifact
//! delay, the way an overlay logger would. A relative artifact path lands in
//! the `output_folder=` named by the launch environment.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use eb_core::{Clock, FakeClock, KillPolicy};
use parking_lot::Mutex;

use super::{LaunchSpec, ProcessAdapter, ProcessError};

/// Scripted behavior of the next spawned process
#[derive(Debug, Clone, Default)]
pub struct FakeBehavior {
    /// Exit on its own after this long (`None` = run until killed)
    pub lifetime: Option<Duration>,
    /// Write `path` once this long has elapsed (relative: inside the
    /// overlay output folder)
    pub artifact: Option<(Duration, PathBuf)>,
    /// Number of termination rounds the tree survives
    pub resists_rounds: u32,
    /// Files the process creates as soon as it starts
    pub writes_on_spawn: Vec<PathBuf>,
    /// Make `spawn` fail
    pub fail_spawn: bool,
}

impl FakeBehavior {
    /// Runs until killed; writes `artifact` after `after`
    pub fn completes(after: Duration, artifact: impl Into<PathBuf>) -> Self {
        Self { artifact: Some((after, artifact.into())), ..Self::default() }
    }

    /// Exits on its own after `after` without writing anything
    pub fn dies(after: Duration) -> Self {
        Self { lifetime: Some(after), ..Self::default() }
    }

    pub fn resisting(mut self, rounds: u32) -> Self {
        self.resists_rounds = rounds;
        self
    }
}

/// Recorded adapter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessCall {
    Spawn { spec: LaunchSpec, watched_existed: Option<bool> },
    IsAlive { pid: u32 },
    TerminateTree { pid: u32 },
    CaptureOutput { program: PathBuf, args: Vec<String> },
}

#[derive(Debug)]
struct FakeProc {
    behavior: FakeBehavior,
    started: Instant,
    killed: bool,
    artifact_written: bool,
}

#[derive(Default)]
struct FakeState {
    scripts: VecDeque<FakeBehavior>,
    procs: HashMap<u32, FakeProc>,
    next_pid: u32,
    calls: Vec<ProcessCall>,
    watched: Option<PathBuf>,
    outputs: HashMap<PathBuf, String>,
}

/// Fake adapter driven by a [`FakeClock`]
#[derive(Clone)]
pub struct FakeProcessAdapter {
    clock: FakeClock,
    inner: Arc<Mutex<FakeState>>,
}

impl FakeProcessAdapter {
    pub fn new(clock: FakeClock) -> Self {
        Self {
            clock,
            inner: Arc::new(Mutex::new(FakeState { next_pid: 4000, ..FakeState::default() })),
        }
    }

    /// Queue the behavior of the next spawned process. Unscripted spawns run
    /// forever and never write an artifact.
    pub fn push(&self, behavior: FakeBehavior) {
        self.inner.lock().scripts.push_back(behavior);
    }

    /// Record whether `path` exists at each spawn
    pub fn watch_path(&self, path: impl Into<PathBuf>) {
        self.inner.lock().watched = Some(path.into());
    }

    /// Canned output for `capture_output(program, ..)`
    pub fn set_output(&self, program: impl Into<PathBuf>, output: impl Into<String>) {
        self.inner.lock().outputs.insert(program.into(), output.into());
    }

    pub fn calls(&self) -> Vec<ProcessCall> {
        self.inner.lock().calls.clone()
    }

    pub fn spawned(&self) -> Vec<LaunchSpec> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ProcessCall::Spawn { spec, .. } => Some(spec),
                _ => None,
            })
            .collect()
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ProcessCall::TerminateTree { pid } => Some(pid),
                _ => None,
            })
            .collect()
    }
}

fn output_folder(spec: &LaunchSpec) -> Option<PathBuf> {
    spec.env.iter().find_map(|(_, value)| {
        value.split(',').find_map(|kv| kv.strip_prefix("output_folder=")).map(PathBuf::from)
    })
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn spawn(&self, spec: LaunchSpec) -> Result<u32, ProcessError> {
        let mut state = self.inner.lock();
        let watched_existed = state.watched.as_ref().map(|p| p.exists());
        state.calls.push(ProcessCall::Spawn { spec: spec.clone(), watched_existed });

        let mut behavior = state.scripts.pop_front().unwrap_or_default();
        if behavior.fail_spawn {
            return Err(ProcessError::SpawnFailed {
                program: spec.program,
                reason: "scripted failure".to_string(),
            });
        }
        if let (Some((_, path)), Some(dir)) = (&mut behavior.artifact, output_folder(&spec)) {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
        for path in &behavior.writes_on_spawn {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = std::fs::write(path, b"");
        }
        state.next_pid += 1;
        let pid = state.next_pid;
        state.procs.insert(
            pid,
            FakeProc { behavior, started: self.clock.now(), killed: false, artifact_written: false },
        );
        Ok(pid)
    }

    async fn is_alive(&self, pid: u32) -> bool {
        let now = self.clock.now();
        let mut state = self.inner.lock();
        state.calls.push(ProcessCall::IsAlive { pid });
        let Some(proc) = state.procs.get_mut(&pid) else {
            return false;
        };
        if proc.killed {
            return false;
        }
        let elapsed = now.duration_since(proc.started);
        if let Some((after, path)) = &proc.behavior.artifact {
            if !proc.artifact_written && elapsed >= *after {
                if let Some(parent) = path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                let _ = std::fs::write(path, "Average FPS,0.1% Min FPS,1% Min FPS\n60,30,45\n");
                proc.artifact_written = true;
            }
        }
        proc.behavior.lifetime.map_or(true, |life| elapsed < life)
    }

    async fn terminate_tree(&self, pid: u32, policy: &KillPolicy) -> Result<(), ProcessError> {
        let mut state = self.inner.lock();
        state.calls.push(ProcessCall::TerminateTree { pid });
        let Some(proc) = state.procs.get_mut(&pid) else {
            return Ok(());
        };
        if proc.killed {
            return Ok(());
        }
        if let Some(max) = policy.max_rounds {
            if proc.behavior.resists_rounds >= max {
                return Err(ProcessError::Unkillable { pid, rounds: max, survivors: vec![pid] });
            }
        }
        proc.killed = true;
        Ok(())
    }

    async fn capture_output(&self, program: &Path, args: &[&str]) -> Result<String, ProcessError> {
        let mut state = self.inner.lock();
        state.calls.push(ProcessCall::CaptureOutput {
            program: program.to_path_buf(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        state.outputs.get(program).cloned().ok_or_else(|| ProcessError::CaptureFailed {
            program: program.to_path_buf(),
            reason: "no scripted output".to_string(),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
