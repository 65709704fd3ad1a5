// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build metadata from the side-channel version reporter.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eb_adapters::ProcessAdapter;
use eb_core::product::{VERSION_FILE, VERSION_REPORTER};
use eb_core::Candidate;

use crate::permissions::is_executable;

/// Longest wait for `eden-cli --version` before falling back.
pub const REPORTER_TIMEOUT: Duration = Duration::from_secs(10);

/// Write `eden-cli-version.txt` into `dir`.
///
/// Uses the `eden-cli --version` output when the reporter sits next to the
/// candidate and answers within [`REPORTER_TIMEOUT`]; otherwise the build
/// identifier itself.
pub async fn record_version<P: ProcessAdapter>(
    process: &P,
    candidate: &Candidate,
    dir: &Path,
) -> io::Result<PathBuf> {
    record_version_within(process, candidate, dir, REPORTER_TIMEOUT).await
}

pub(crate) async fn record_version_within<P: ProcessAdapter>(
    process: &P,
    candidate: &Candidate,
    dir: &Path,
    limit: Duration,
) -> io::Result<PathBuf> {
    let reporter = candidate.parent_dir().join(VERSION_REPORTER);
    let contents = if is_executable(&reporter) {
        match tokio::time::timeout(limit, process.capture_output(&reporter, &["--version"])).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::warn!(build_id = %candidate.build_id, error = %e, "version reporter failed");
                fallback(candidate)
            }
            Err(_) => {
                tracing::warn!(
                    build_id = %candidate.build_id,
                    timeout_ms = limit.as_millis() as u64,
                    "version reporter timed out"
                );
                fallback(candidate)
            }
        }
    } else {
        fallback(candidate)
    };

    let path = dir.join(VERSION_FILE);
    tokio::fs::write(&path, contents).await?;
    Ok(path)
}

fn fallback(candidate: &Candidate) -> String {
    format!("{}\n", candidate.build_id)
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
