// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full batches against shell-script builds.

use crate::prelude::*;

#[test]
fn successful_run_is_committed_with_sidecars() {
    let project = Project::empty();
    project.script("build/bin/eden", COMPLETING_BUILD);
    project.script("build/bin/eden-cli", "echo \"eden 0.1.0-test\"\n");

    project.bench().passes().stdout_has("1 committed");

    let records = project.records("build_bin");
    assert_eq!(records.len(), 1, "expected one record, found {:?}", records);
    let record = &records[0];
    assert_eq!(project.read(&record.join("eden-cli-game-name.txt")), format!("{}\n", GAME_NAME));
    assert_eq!(project.read(&record.join("eden-cli-game-id.txt")), format!("{}\n", GAME_ID));
    assert_eq!(project.read(&record.join("eden-cli-version.txt")), "eden 0.1.0-test\n");
    assert!(record.join("eden_capture.csv").is_file());
    assert!(record.join("eden_capture_summary.csv").is_file());

    // working directory is consumed by the commit
    let leftovers: Vec<_> = std::fs::read_dir(project.path().join("work")).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[test]
fn crash_is_reported_and_batch_continues() {
    let project = Project::empty();
    project.script("artifacts/a-crashy.AppImage", CRASHING_BUILD);
    project.script("artifacts/b-stable.AppImage", COMPLETING_BUILD);

    project
        .bench()
        .passes()
        .stdout_has("2 run(s): 1 committed, 1 died")
        .stdout_has("process exited before the capture completed");

    assert!(project.records("a-crashy").is_empty());
    assert_eq!(project.records("b-stable").len(), 1);
    assert_eq!(project.aggregator_calls().len(), 1);
}

#[test]
fn aggregator_gets_log_root_and_filter() {
    let project = Project::empty();
    project.script("build/bin/eden", COMPLETING_BUILD);

    project.bench().env("EDEN_BENCH_FILTER", "percent").passes();

    assert_eq!(project.aggregator_calls(), vec!["benchmark-logs --filter-percent".to_string()]);
}

#[test]
fn aggregator_failure_is_only_a_warning() {
    let project = Project::empty();
    project.script("build/bin/eden", COMPLETING_BUILD);
    project.script("tools/aggregate", "exit 2\n");

    project
        .bench()
        .passes()
        .stdout_has("warn: aggregator exited unsuccessfully")
        .stdout_has("aggregator exit: 2");
}

#[test]
fn unidentified_workload_leaves_capture_uncommitted() {
    let project = Project::empty();
    project.script("artifacts/quiet.AppImage", SILENT_BUILD);

    project.bench().passes().stdout_has("1 unclassified");

    assert!(!project.path().join("benchmark-logs").exists());
    let kept: Vec<_> = std::fs::read_dir(project.path().join("work"))
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .collect();
    assert_eq!(kept.len(), 1);
    assert!(kept[0].join("eden_capture_summary.csv").is_file());
}

#[test]
fn reference_build_is_filed_with_suffix() {
    let project = Project::empty();
    project.script("build/bin/reference/eden", COMPLETING_BUILD);

    project.bench().passes();

    assert_eq!(project.records("build_bin_reference_master").len(), 1);
}

#[test]
fn json_report_describes_every_run() {
    let project = Project::empty();
    project.script("artifacts/a-crashy.AppImage", CRASHING_BUILD);
    project.script("artifacts/b-stable.AppImage", COMPLETING_BUILD);
    project.script("tools/aggregate", "echo \"compared $1\"\n");

    let run = project
        .bench()
        .args(&["--output", "json"])
        .passes()
        .stderr_has("[eden-bench] discovered executables")
        .stderr_has("compared ");

    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    let runs = json["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["verdict"], "died");
    assert_eq!(runs[1]["verdict"], "committed");
    assert_eq!(runs[1]["record"]["workload"]["id"], GAME_ID);
    assert_eq!(json["handoff"]["exit_code"], 0);
}
