// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build identity: candidate executables and the identifiers their logs are
//! filed under.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::product::{PRODUCT_NAME, REFERENCE_SUFFIX};

/// Character joining parent-directory components in derived identifiers.
const JOIN: &str = "_";

/// Identifier a build's Log Records are filed under.
///
/// Derived purely from the executable's base name, its parent directory and
/// whether it is a reference build; see [`BuildId::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BuildId(String);

impl BuildId {
    /// Derive the identifier for an executable path.
    pub fn classify(path: &Path, is_reference: bool) -> Self {
        let base = base_name(path);
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_parts(&base, parent, is_reference)
    }

    /// Derive the identifier from already-split inputs.
    ///
    /// A base name equal to the generic product name says nothing about which
    /// build it is, so the parent path is used instead (`build1/bin` →
    /// `build1_bin`). Any other base name is used as-is.
    pub fn from_parts(base_name: &str, parent: &Path, is_reference: bool) -> Self {
        let mut id = if base_name.eq_ignore_ascii_case(PRODUCT_NAME) {
            let joined = join_components(parent);
            if joined.is_empty() {
                base_name.to_string()
            } else {
                joined
            }
        } else {
            base_name.to_string()
        };
        if is_reference {
            id.push_str(REFERENCE_SUFFIX);
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File name with its last extension stripped.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn join_components(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(JOIN)
}

/// A discovered build executable. Read-only after discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Path as found under the configured root (may be relative)
    pub path: PathBuf,
    /// Absolute path used for launching
    pub abs_path: PathBuf,
    /// Found under a reference subtree
    pub is_reference: bool,
    pub build_id: BuildId,
}

impl Candidate {
    pub fn new(path: PathBuf, abs_path: PathBuf, is_reference: bool) -> Self {
        let build_id = BuildId::classify(&path, is_reference);
        Self { path, abs_path, is_reference, build_id }
    }

    /// Directory holding the executable (and its version reporter, if any)
    pub fn parent_dir(&self) -> &Path {
        self.abs_path.parent().unwrap_or_else(|| Path::new("/"))
    }

    pub fn kind(&self) -> &'static str {
        if self.is_reference {
            "reference"
        } else {
            "candidate"
        }
    }
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
