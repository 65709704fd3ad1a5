// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Which executables a batch picks up.

use crate::prelude::*;

#[test]
fn no_candidates_is_fatal_and_skips_aggregation() {
    let project = Project::empty();
    project.file("build/bin/README.txt", "not a build\n");

    project.bench().fails().stdout_has("no executables found");

    assert!(project.aggregator_calls().is_empty());
    assert!(!project.path().join("work").exists());
}

#[test]
fn dry_run_lists_builds_without_running_them() {
    let project = Project::empty();
    project.script("build/bin/eden", COMPLETING_BUILD);
    project.script("build/bin/eden-cli", "echo eden 0.1.0\n");
    project.script("artifacts/Eden-nightly.AppImage", COMPLETING_BUILD);
    project.script("artifacts/reference/eden-stable.AppImage", COMPLETING_BUILD);

    project
        .bench()
        .args(&["--dry-run"])
        .passes()
        .stdout_has("3 executable(s)")
        .stdout_has("build_bin")
        .stdout_has("Eden-nightly")
        .stdout_has("eden-stable_master")
        .stdout_lacks("eden-cli");

    assert!(!project.path().join("work").exists());
    assert!(!project.path().join("benchmark-logs").exists());
    assert!(project.aggregator_calls().is_empty());
}

#[test]
fn dry_run_json_is_machine_readable() {
    let project = Project::empty();
    project.script("artifacts/nightly.AppImage", COMPLETING_BUILD);

    let run = project
        .bench()
        .env("EDEN_BENCH_LOG", "debug")
        .args(&["--dry-run", "--output", "json"])
        .passes()
        .stderr_has("[eden-bench] debug: discovered executable");

    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(json[0]["build_id"], "nightly");
    assert_eq!(json[0]["is_reference"], false);
}
