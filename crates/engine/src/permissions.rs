// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execute-permission checks for candidate executables.

use std::io;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Whether `path` is a file with any execute bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Make `path` executable if it is not already; one attempt only.
///
/// Returns `Ok(true)` if permissions were changed.
#[cfg(unix)]
pub fn ensure_executable(path: &Path) -> io::Result<bool> {
    if is_executable(path) {
        return Ok(false);
    }
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)?;
    if is_executable(path) {
        Ok(true)
    } else {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "execute bit did not stick"))
    }
}

#[cfg(not(unix))]
pub fn ensure_executable(path: &Path) -> io::Result<bool> {
    if path.is_file() {
        Ok(false)
    } else {
        Err(io::Error::new(io::ErrorKind::NotFound, "not a file"))
    }
}
