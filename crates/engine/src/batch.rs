// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch orchestration: every candidate in turn, then one aggregator handoff.

use std::path::PathBuf;
use std::time::Duration;

use eb_adapters::ProcessAdapter;
use eb_core::product::runtime_log_path;
use eb_core::{timestamp_label, BuildId, Candidate, Clock, Config, RunOutcome};
use serde::Serialize;
use thiserror::Error;

use crate::classifier::{self, LogRecord};
use crate::discovery::{self, DiscoveryError};
use crate::handoff::{self, HandoffResult};
use crate::supervisor::{RunSession, Supervisor, SupervisorError};

/// Fatal batch errors (exit code 1)
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

/// Final disposition of one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum RunVerdict {
    /// Artifacts filed under the Log Record tree
    Committed { record: LogRecord },
    /// Capture completed but could not be filed; artifacts stay in `work_dir`
    Unclassified { reason: String, work_dir: PathBuf },
    Died {
        #[serde(serialize_with = "secs")]
        elapsed: Duration,
        work_dir: PathBuf,
    },
    Skipped { reason: String },
}

/// Field-less tag of a [`RunVerdict`], for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictKind {
    Committed,
    Unclassified,
    Died,
    Skipped,
}

eb_core::simple_display! {
    VerdictKind {
        Committed => "committed",
        Unclassified => "unclassified",
        Died => "died",
        Skipped => "skipped",
    }
}

impl RunVerdict {
    pub fn kind(&self) -> VerdictKind {
        match self {
            RunVerdict::Committed { .. } => VerdictKind::Committed,
            RunVerdict::Unclassified { .. } => VerdictKind::Unclassified,
            RunVerdict::Died { .. } => VerdictKind::Died,
            RunVerdict::Skipped { .. } => VerdictKind::Skipped,
        }
    }
}

impl std::fmt::Display for RunVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind().fmt(f)
    }
}

fn secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// One row of the batch report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEntry {
    pub build_id: BuildId,
    pub path: PathBuf,
    pub is_reference: bool,
    pub timestamp: String,
    #[serde(flatten)]
    pub verdict: RunVerdict,
}

/// Outcome of a whole batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub runs: Vec<RunEntry>,
    pub log_root: PathBuf,
    pub handoff: Option<HandoffResult>,
}

impl BatchReport {
    pub fn count(&self, kind: VerdictKind) -> usize {
        self.runs.iter().filter(|r| r.verdict.kind() == kind).count()
    }

    pub fn committed(&self) -> usize {
        self.count(VerdictKind::Committed)
    }

    /// Runs that produced no Log Record
    pub fn failed(&self) -> usize {
        self.runs.len() - self.committed()
    }
}

/// Sequential runner over a candidate list
pub struct Batch<'a, P: ProcessAdapter, C: Clock> {
    config: &'a Config,
    supervisor: Supervisor<P, C>,
}

impl<'a, P: ProcessAdapter, C: Clock> Batch<'a, P, C> {
    pub fn new(config: &'a Config, process: P, clock: C) -> Self {
        Self { config, supervisor: Supervisor::new(process, clock, config) }
    }

    /// Run every candidate in order. Only an unkillable process tree stops
    /// the batch early.
    pub async fn run_all(&self, candidates: &[Candidate]) -> Result<Vec<RunEntry>, SupervisorError> {
        let total = candidates.len();
        let mut entries = Vec::with_capacity(total);
        for (i, candidate) in candidates.iter().enumerate() {
            tracing::info!(
                build_id = %candidate.build_id,
                kind = candidate.kind(),
                path = %candidate.path.display(),
                "run {}/{}",
                i + 1,
                total
            );
            entries.push(self.run_one(candidate).await?);
        }
        Ok(entries)
    }

    /// Supervise one candidate and file its result.
    pub async fn run_one(&self, candidate: &Candidate) -> Result<RunEntry, SupervisorError> {
        let timestamp = timestamp_label(self.supervisor.clock().epoch_ms());
        let mut session = RunSession::new(candidate, &timestamp, &self.config.work_dir);

        let verdict = match self.supervisor.run(candidate, &mut session).await? {
            RunOutcome::Skipped { reason } => RunVerdict::Skipped { reason },
            RunOutcome::Died { elapsed } => RunVerdict::Died { elapsed, work_dir: session.work_dir },
            RunOutcome::Succeeded { .. } => self.classify(&session),
        };

        Ok(RunEntry {
            build_id: candidate.build_id.clone(),
            path: candidate.path.clone(),
            is_reference: candidate.is_reference,
            timestamp,
            verdict,
        })
    }

    fn classify(&self, session: &RunSession) -> RunVerdict {
        let unclassified = |reason: String| {
            tracing::warn!(
                build_id = %session.build_id,
                work_dir = %session.work_dir.display(),
                reason = %reason,
                "leaving run uncommitted"
            );
            RunVerdict::Unclassified { reason, work_dir: session.work_dir.clone() }
        };

        let workload = match classifier::detect_workload(&runtime_log_path(&self.config.data_dir)) {
            Ok(workload) => workload,
            Err(e) => return unclassified(e.to_string()),
        };
        match classifier::commit(
            &session.work_dir,
            &self.config.log_dir,
            &workload,
            &session.build_id,
            &session.timestamp,
        ) {
            Ok(record) => RunVerdict::Committed { record },
            Err(e) => unclassified(e.to_string()),
        }
    }
}

/// Discover, run every candidate, then hand the Log Record tree to the
/// aggregator once. Preflight is the caller's job.
pub async fn orchestrate<P: ProcessAdapter, C: Clock>(
    config: &Config,
    process: P,
    clock: C,
) -> Result<BatchReport, BatchError> {
    let candidates = discovery::discover(config)?;
    tracing::info!(count = candidates.len(), "discovered executables");

    let batch = Batch::new(config, process, clock);
    let runs = batch.run_all(&candidates).await?;

    let handoff = match handoff::invoke(&config.aggregator, &config.log_dir, config.aggregator_stdout).await {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!(error = %e, "aggregation handoff failed");
            None
        }
    };

    let report = BatchReport { runs, log_root: config.log_dir.clone(), handoff };
    tracing::info!(
        runs = report.runs.len(),
        committed = report.committed(),
        failed = report.failed(),
        "batch complete"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
