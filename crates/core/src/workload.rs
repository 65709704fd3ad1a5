// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workload identity parsed from the emulator's runtime log.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// `Loading <name> (<16 hex digits>)`. The name is lazy so a title that
/// itself contains parentheses still binds the trailing id.
#[allow(clippy::expect_used)]
static LOADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Loading (?P<name>.+?) \((?P<id>[0-9A-Fa-f]{16})\)")
        .expect("constant regex pattern is valid")
});

/// Content that was active during a captured run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workload {
    /// Human-readable title
    pub name: String,
    /// Fixed-width hex id, as written in the log
    pub id: String,
}

impl Workload {
    /// Parse a single log line.
    pub fn from_line(line: &str) -> Option<Self> {
        let caps = LOADING_LINE.captures(line)?;
        Some(Self { name: caps["name"].trim().to_string(), id: caps["id"].to_string() })
    }

    /// The workload named by the last `Loading` line in `log`.
    pub fn last_in(log: &str) -> Option<Self> {
        log.lines().rev().find_map(Self::from_line)
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
