// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shader cache reset before each launch.

use std::io;
use std::path::Path;

/// Remove the emulator's shader cache so every build starts cold.
///
/// Returns whether anything was removed. Called once per run, strictly
/// before launch; never after, so post-run caches stay inspectable.
pub fn clear_shader_cache(dir: &Path) -> io::Result<bool> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            tracing::debug!(dir = %dir.display(), "cleared shader cache");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
