// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup checks for the external tools a batch depends on.

use std::ffi::OsStr;
use std::path::PathBuf;

use eb_core::Config;
use thiserror::Error;

use crate::permissions::is_executable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreflightError {
    #[error("required tool {tool:?} ({role}) not found on PATH")]
    MissingTool { tool: String, role: &'static str },
}

/// Resolve `program` the way a shell would: names containing a separator are
/// taken as paths, bare names are searched in `path_var`.
pub fn find_on_path(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if program.contains('/') {
        let path = PathBuf::from(program);
        return is_executable(&path).then_some(path);
    }
    std::env::split_paths(path_var?)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

/// Every tool the batch cannot run without: the overlay logger and the
/// aggregator's program.
pub fn require_tools(config: &Config) -> Result<Vec<PathBuf>, PreflightError> {
    let path_var = std::env::var_os("PATH");
    [
        (config.overlay_tool.as_str(), "overlay logger"),
        (config.aggregator.program.as_str(), "aggregator"),
    ]
    .into_iter()
    .map(|(tool, role)| {
        let found = find_on_path(tool, path_var.as_deref())
            .ok_or_else(|| PreflightError::MissingTool { tool: tool.to_string(), role })?;
        tracing::debug!(tool, path = %found.display(), "found required tool");
        Ok(found)
    })
    .collect()
}

#[cfg(test)]
#[path = "preflight_tests.rs"]
mod tests;
