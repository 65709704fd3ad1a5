// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

const ALL: &[&str] = &[
    BUILD_DIR,
    ARTIFACTS_DIR,
    REFERENCE_SUBDIR,
    LOG_DIR,
    WORK_DIR,
    DATA_DIR,
    DURATION,
    WARMUP,
    POLL_MS,
    KILL_RETRIES,
    OVERLAY,
    AGGREGATOR,
    FILTER,
    LOG,
];

/// Clear every variable, then apply `vars`.
fn with_env(vars: &[(&str, &str)]) {
    for name in ALL {
        std::env::remove_var(name);
    }
    std::env::set_var(DATA_DIR, "/home/tester/.local/share");
    for (name, value) in vars {
        std::env::set_var(name, value);
    }
}

#[test]
#[serial]
fn defaults() {
    with_env(&[]);
    let config = load().unwrap();

    assert_eq!(config.build_dir, PathBuf::from("build/bin"));
    assert_eq!(config.artifacts_dir, PathBuf::from("artifacts"));
    assert_eq!(config.reference_subdir, "reference");
    assert_eq!(config.log_dir, PathBuf::from("benchmark-logs"));
    assert_eq!(config.data_dir, PathBuf::from("/home/tester/.local/share"));
    assert_eq!(config.capture, CaptureWindow::default());
    assert_eq!(config.kill.max_rounds, None);
    assert_eq!(config.overlay_tool, "mangohud");
    assert_eq!(config.aggregator, AggregatorCommand::default());
    assert_eq!(log_filter(), "info");
}

#[test]
#[serial]
fn overrides() {
    with_env(&[
        (BUILD_DIR, "out/bin"),
        (ARTIFACTS_DIR, "dl"),
        (REFERENCE_SUBDIR, "baseline"),
        (LOG_DIR, "/var/bench"),
        (WORK_DIR, "/scratch"),
        (DURATION, "30"),
        (WARMUP, "3"),
        (POLL_MS, "250"),
        (KILL_RETRIES, "4"),
        (OVERLAY, "/opt/mangohud/bin/mangohud"),
        (AGGREGATOR, "python3  scripts/compare.py --plot"),
        (FILTER, "IQR"),
        (LOG, "debug"),
    ]);
    let config = load().unwrap();

    assert_eq!(config.build_dir, PathBuf::from("out/bin"));
    assert_eq!(config.artifacts_dir, PathBuf::from("dl"));
    assert_eq!(config.reference_subdir, "baseline");
    assert_eq!(config.log_dir, PathBuf::from("/var/bench"));
    assert_eq!(config.work_dir, PathBuf::from("/scratch"));
    assert_eq!(config.capture.duration, Duration::from_secs(30));
    assert_eq!(config.capture.warmup, Duration::from_secs(3));
    assert_eq!(config.capture.poll, Duration::from_millis(250));
    assert_eq!(config.kill.max_rounds, Some(4));
    assert_eq!(config.overlay_tool, "/opt/mangohud/bin/mangohud");
    assert_eq!(
        config.aggregator,
        AggregatorCommand {
            program: "python3".to_string(),
            args: vec!["scripts/compare.py".to_string(), "--plot".to_string()],
            filter: Some(OutlierFilter::Iqr),
        }
    );
    assert_eq!(log_filter(), "debug");
}

#[test]
#[serial]
fn empty_values_count_as_unset() {
    with_env(&[(DURATION, ""), (FILTER, "  ")]);
    let config = load().unwrap();
    assert_eq!(config.capture, CaptureWindow::default());
    assert_eq!(config.aggregator.filter, None);
}

#[yare::parameterized(
    warmup_equals_duration = { &[(DURATION, "10"), (WARMUP, "10")] },
    warmup_exceeds_default = { &[(WARMUP, "90")] },
    not_a_number           = { &[(DURATION, "sixty")] },
    negative               = { &[(WARMUP, "-1")] },
    zero_poll              = { &[(POLL_MS, "0")] },
    zero_kill_rounds       = { &[(KILL_RETRIES, "0")] },
    unknown_filter         = { &[(FILTER, "median")] },
)]
#[serial]
fn rejects_invalid(vars: &[(&str, &str)]) {
    with_env(vars);
    assert!(load().is_err(), "expected {:?} to be rejected", vars);
}

#[test]
#[serial]
fn invalid_number_names_the_variable() {
    with_env(&[(POLL_MS, "fast")]);
    assert_eq!(
        load().unwrap_err(),
        ConfigError::InvalidValue { var: POLL_MS.to_string(), value: "fast".to_string() }
    );
}
