// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output.

use crate::prelude::*;

#[test]
fn help_lists_flags() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--dry-run")
        .stdout_has("--output");
}

#[test]
fn version_shows_package_version() {
    cli().args(&["--version"]).passes().stdout_has("eden-bench 0.1");
}
