// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result classification: which workload a finished run captured, and filing
//! its artifacts into the committed Log Record tree.
//!
//! ```text
//! {log_root}/{workload_id}/{build_id}/{timestamp}/
//!     eden_*.csv                 raw overlay output
//!     *_summary.csv              completion artifact
//!     eden-cli-version.txt
//!     eden-cli-game-name.txt
//!     eden-cli-game-id.txt
//! ```

use std::io;
use std::path::{Path, PathBuf};

use eb_core::product::{GAME_ID_FILE, GAME_NAME_FILE};
use eb_core::{BuildId, Workload};
use serde::Serialize;
use thiserror::Error;

/// Per-run classification failures. None of these abort the batch.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("cannot read runtime log {}: {source}", path.display())]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no workload line in runtime log {}", path.display())]
    NoWorkload { path: PathBuf },
    #[error("failed to commit {} into {}: {source}", from.display(), to.display())]
    Commit {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A committed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub dir: PathBuf,
    pub workload: Workload,
    pub build_id: BuildId,
    pub timestamp: String,
}

/// Workload named by the last `Loading` line of the runtime log.
pub fn detect_workload(runtime_log: &Path) -> Result<Workload, ClassifyError> {
    let bytes = std::fs::read(runtime_log).map_err(|source| ClassifyError::LogUnreadable {
        path: runtime_log.to_path_buf(),
        source,
    })?;
    // The emulator does not promise UTF-8 in titles
    let text = String::from_utf8_lossy(&bytes);
    Workload::last_in(&text)
        .ok_or_else(|| ClassifyError::NoWorkload { path: runtime_log.to_path_buf() })
}

/// `{log_root}/{workload_id}/{build_id}/{timestamp}`
pub fn record_dir(log_root: &Path, workload: &Workload, build_id: &BuildId, timestamp: &str) -> PathBuf {
    log_root.join(&workload.id).join(build_id.as_str()).join(timestamp)
}

/// Move everything in `work_dir` into its Log Record and write the workload
/// sidecars.
///
/// The record is assembled in a hidden sibling directory and renamed into
/// place last, so the aggregator never sees a partial record. On failure the
/// moved entries are returned to `work_dir`. An existing record at the same
/// path is replaced.
pub fn commit(
    work_dir: &Path,
    log_root: &Path,
    workload: &Workload,
    build_id: &BuildId,
    timestamp: &str,
) -> Result<LogRecord, ClassifyError> {
    let dir = record_dir(log_root, workload, build_id, timestamp);
    let fail = |source: io::Error| ClassifyError::Commit {
        from: work_dir.to_path_buf(),
        to: dir.clone(),
        source,
    };

    let staging = staging_dir(&dir);
    if let Err(e) = stage(work_dir, &staging, workload).and_then(|()| publish(&staging, &dir)) {
        restore(&staging, work_dir);
        return Err(fail(e));
    }
    std::fs::remove_dir(work_dir).map_err(fail)?;

    tracing::info!(
        build_id = %build_id,
        workload = %workload,
        dir = %dir.display(),
        "committed log record"
    );
    Ok(LogRecord {
        dir,
        workload: workload.clone(),
        build_id: build_id.clone(),
        timestamp: timestamp.to_string(),
    })
}

/// `{parent}/.{timestamp}.partial`
fn staging_dir(dir: &Path) -> PathBuf {
    let name = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    dir.with_file_name(format!(".{}.partial", name))
}

fn stage(work_dir: &Path, staging: &Path, workload: &Workload) -> io::Result<()> {
    if staging.exists() {
        std::fs::remove_dir_all(staging)?;
    }
    std::fs::create_dir_all(staging)?;
    for entry in std::fs::read_dir(work_dir)? {
        let entry = entry?;
        move_entry(&entry.path(), &staging.join(entry.file_name()))?;
    }
    std::fs::write(staging.join(GAME_NAME_FILE), format!("{}\n", workload.name))?;
    std::fs::write(staging.join(GAME_ID_FILE), format!("{}\n", workload.id))
}

fn publish(staging: &Path, dir: &Path) -> io::Result<()> {
    match std::fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(dir)?,
        Ok(_) => return Err(io::Error::new(io::ErrorKind::AlreadyExists, "record path is not a directory")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    std::fs::rename(staging, dir)
}

/// Best-effort return of staged artifacts after a failed commit.
fn restore(staging: &Path, work_dir: &Path) {
    let Ok(entries) = std::fs::read_dir(staging) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        if name == GAME_NAME_FILE || name == GAME_ID_FILE {
            continue;
        }
        if let Err(e) = move_entry(&entry.path(), &work_dir.join(&name)) {
            tracing::warn!(path = %entry.path().display(), error = %e, "could not restore artifact");
        }
    }
    if let Err(e) = std::fs::remove_dir_all(staging) {
        tracing::warn!(dir = %staging.display(), error = %e, "could not remove staging directory");
    }
}

/// Rename, or copy then remove when the rename crosses file systems.
fn move_entry(from: &Path, to: &Path) -> io::Result<()> {
    if to.is_dir() && !from.is_dir() {
        std::fs::remove_dir_all(to)?;
    }
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::debug!(from = %from.display(), error = %e, "rename failed, copying");
            copy_recursive(from, to)?;
            if from.is_dir() {
                std::fs::remove_dir_all(from)
            } else {
                std::fs::remove_file(from)
            }
        }
    }
}

fn copy_recursive(from: &Path, to: &Path) -> io::Result<()> {
    if from.is_dir() {
        std::fs::create_dir_all(to)?;
        for entry in std::fs::read_dir(from)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &to.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        std::fs::copy(from, to).map(|_| ())
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
