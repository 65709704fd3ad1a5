// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executable discovery across the configured build trees.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use eb_core::product::COMPANION_BINARIES;
use eb_core::{Candidate, Config, DiscoveryRoot};
use glob::{MatchOptions, Pattern};
use thiserror::Error;

/// Errors from discovery. Both are fatal configuration errors.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid candidate pattern {pattern:?}: {reason}")]
    BadPattern { pattern: String, reason: String },
    #[error("no executables found in {}", format_roots(.roots))]
    NoCandidates { roots: Vec<PathBuf> },
}

fn format_roots(roots: &[PathBuf]) -> String {
    roots.iter().map(|r| r.display().to_string()).collect::<Vec<_>>().join(", ")
}

const MATCH: MatchOptions =
    MatchOptions { case_sensitive: false, require_literal_separator: true, require_literal_leading_dot: true };

/// Discover every candidate under the configured roots, in scan order.
pub fn discover(config: &Config) -> Result<Vec<Candidate>, DiscoveryError> {
    let patterns = compile(&config.patterns)?;
    let roots = config.discovery_roots();

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for root in &roots {
        for candidate in scan_root(root, &patterns) {
            if seen.insert(candidate.abs_path.clone()) {
                tracing::debug!(
                    path = %candidate.path.display(),
                    build_id = %candidate.build_id,
                    kind = candidate.kind(),
                    "discovered executable"
                );
                candidates.push(candidate);
            }
        }
    }

    if candidates.is_empty() {
        return Err(DiscoveryError::NoCandidates {
            roots: roots.into_iter().map(|r| r.dir).collect(),
        });
    }
    Ok(candidates)
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, DiscoveryError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| DiscoveryError::BadPattern {
                pattern: p.clone(),
                reason: e.msg.to_string(),
            })
        })
        .collect()
}

/// Whether `name` is a candidate executable's file name.
pub fn is_candidate_name(name: &str, patterns: &[Pattern]) -> bool {
    if COMPANION_BINARIES.iter().any(|c| name.eq_ignore_ascii_case(c)) {
        return false;
    }
    patterns.iter().any(|p| p.matches_with(name, MATCH))
}

/// Immediate children of one root that look like executables. Missing
/// directories yield nothing.
fn scan_root(root: &DiscoveryRoot, patterns: &[Pattern]) -> Vec<Candidate> {
    let entries = match std::fs::read_dir(&root.dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %root.dir.display(), error = %e, "skipping unreadable root");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| is_candidate_name(name, patterns))
        .collect();
    names.sort();

    names
        .into_iter()
        .filter_map(|name| {
            let path = root.dir.join(&name);
            if !path.is_file() {
                return None;
            }
            let abs_path = absolute(&path)?;
            Some(Candidate::new(path, abs_path, root.is_reference))
        })
        .collect()
}

fn absolute(path: &Path) -> Option<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot resolve candidate path");
            None
        }
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
