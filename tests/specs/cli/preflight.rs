// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal startup errors exit 1 before anything is launched.

use crate::prelude::*;

#[test]
fn missing_overlay_tool_is_fatal() {
    let project = Project::empty();
    project.script("build/bin/eden", COMPLETING_BUILD);

    project
        .bench()
        .env("EDEN_BENCH_OVERLAY", "definitely-not-installed-overlay")
        .fails()
        .stdout_has("[eden-bench] error:")
        .stdout_has("definitely-not-installed-overlay");

    assert!(!project.path().join("work").exists());
    assert!(project.aggregator_calls().is_empty());
}

#[test]
fn missing_aggregator_is_fatal() {
    let project = Project::empty();
    project.script("build/bin/eden", COMPLETING_BUILD);

    project
        .bench()
        .env("EDEN_BENCH_AGGREGATOR", "/nonexistent/compare_logs")
        .fails()
        .stdout_has("aggregator");
}

#[test]
fn warmup_not_shorter_than_duration_is_fatal() {
    let project = Project::empty();
    project.script("build/bin/eden", COMPLETING_BUILD);

    project
        .bench()
        .env("EDEN_BENCH_WARMUP", "1")
        .fails()
        .stdout_has("invalid configuration");
}

#[test]
fn unknown_filter_is_fatal() {
    let project = Project::empty();
    project.script("build/bin/eden", COMPLETING_BUILD);

    project.bench().env("EDEN_BENCH_FILTER", "median").fails().stdout_has("median");
}
