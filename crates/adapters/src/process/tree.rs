// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-table scanning for descendant discovery.
//!
//! Descendants are found from `/proc/<pid>/stat` parent links. Where `/proc`
//! is unavailable the table is empty and only the root is signalled.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use nix::sys::signal;
use nix::unistd::Pid;

const PROC_ROOT: &str = "/proc";

/// One row of the process table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcEntry {
    pub pid: u32,
    pub ppid: u32,
    /// Single-letter state from `stat` (`R`, `S`, `Z`, ...)
    pub state: char,
}

impl ProcEntry {
    pub fn is_running(&self) -> bool {
        !matches!(self.state, 'Z' | 'X' | 'x')
    }
}

/// Parse the contents of `/proc/<pid>/stat`.
///
/// The command name is wrapped in parentheses and may itself contain spaces
/// or parentheses, so fields are read after the last `)`.
pub fn parse_stat(stat: &str) -> Option<ProcEntry> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    let pid = stat[..open].trim().parse().ok()?;
    let mut rest = stat.get(close + 1..)?.split_whitespace();
    let state = rest.next()?.chars().next()?;
    let ppid = rest.next()?.parse().ok()?;
    Some(ProcEntry { pid, ppid, state })
}

/// Snapshot of every process visible in `/proc`.
pub fn snapshot() -> Vec<ProcEntry> {
    snapshot_at(Path::new(PROC_ROOT))
}

pub(crate) fn snapshot_at(root: &Path) -> Vec<ProcEntry> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    entries
        .flatten()
        .filter(|e| e.file_name().to_str().is_some_and(|n| n.bytes().all(|b| b.is_ascii_digit())))
        .filter_map(|e| std::fs::read_to_string(e.path().join("stat")).ok())
        .filter_map(|s| parse_stat(&s))
        .collect()
}

/// All transitive children of `roots` in `table` (roots excluded).
pub fn descendants(table: &[ProcEntry], roots: &BTreeSet<u32>) -> BTreeSet<u32> {
    let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
    for entry in table {
        children.entry(entry.ppid).or_default().push(entry.pid);
    }
    let mut found = BTreeSet::new();
    let mut stack: Vec<u32> = roots.iter().copied().collect();
    while let Some(pid) = stack.pop() {
        for &child in children.get(&pid).into_iter().flatten() {
            if !roots.contains(&child) && found.insert(child) {
                stack.push(child);
            }
        }
    }
    found
}

/// Whether an arbitrary (non-child) pid is running. Zombies count as dead.
pub fn is_running(pid: u32) -> bool {
    let proc_root = Path::new(PROC_ROOT);
    match std::fs::read_to_string(proc_root.join(pid.to_string()).join("stat")) {
        Ok(stat) => parse_stat(&stat).is_some_and(|e| e.is_running()),
        Err(_) if !proc_root.join("self").exists() => {
            signal::kill(Pid::from_raw(pid as i32), None).is_ok()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
