// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the CLI specs.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

pub const GAME_ID: &str = "0123456789ABCDEF";
pub const GAME_NAME: &str = "Super Game";

/// Every variable the binary reads; cleared so the host environment cannot
/// leak into a spec.
const BENCH_VARS: &[&str] = &[
    "EDEN_BUILD_DIR",
    "EDEN_ARTIFACTS_DIR",
    "EDEN_BENCH_REFERENCE_SUBDIR",
    "EDEN_BENCH_LOG_DIR",
    "EDEN_BENCH_WORK_DIR",
    "EDEN_BENCH_DATA_DIR",
    "EDEN_BENCH_DURATION",
    "EDEN_BENCH_WARMUP",
    "EDEN_BENCH_POLL_MS",
    "EDEN_BENCH_KILL_RETRIES",
    "EDEN_BENCH_OVERLAY",
    "EDEN_BENCH_AGGREGATOR",
    "EDEN_BENCH_FILTER",
    "EDEN_BENCH_LOG",
];

/// Emulator stand-in: announces a workload in the runtime log, writes an
/// overlay capture with its summary, then idles until killed.
pub const COMPLETING_BUILD: &str = r#"
dir=$(printf '%s' "$MANGOHUD_CONFIG" | tr ',' '\n' | sed -n 's/^output_folder=//p')
mkdir -p "$EDEN_BENCH_DATA_DIR/eden/log"
echo "[   1.000] Loader <Info> Loading Super Game (0123456789ABCDEF)" >> "$EDEN_BENCH_DATA_DIR/eden/log/eden_log.txt"
echo "fps,frametime" > "$dir/eden_capture.csv"
echo "Average FPS,1% Min FPS" > "$dir/eden_capture_summary.csv"
exec sleep 30
"#;

/// Emulator stand-in that crashes on startup.
pub const CRASHING_BUILD: &str = "exit 3\n";

/// Emulator stand-in that captures but never logs a workload.
pub const SILENT_BUILD: &str = r#"
dir=$(printf '%s' "$MANGOHUD_CONFIG" | tr ',' '\n' | sed -n 's/^output_folder=//p')
echo "Average FPS" > "$dir/eden_capture_summary.csv"
exec sleep 30
"#;

/// `eden-bench` without a project (for `--help` and friends).
pub fn cli() -> Cli {
    let mut cmd = Command::cargo_bin("eden-bench").unwrap();
    for var in BENCH_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    Cli { cmd }
}

/// Temporary working tree with tool stand-ins installed.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Project with an overlay tool and a recording aggregator, but no builds.
    pub fn empty() -> Self {
        let project = Self { dir: TempDir::new().unwrap() };
        project.script("tools/mangohud", "exec \"$@\"\n");
        project.script(
            "tools/aggregate",
            &format!("echo \"$@\" >> {}\n", project.path().join("aggregate.calls").display()),
        );
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Executable `#!/bin/sh` script at `rel`.
    pub fn script(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.file(rel, &format!("#!/bin/sh\n{}", body));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// `eden-bench` run from the project root with a one-second capture.
    pub fn bench(&self) -> Cli {
        let mut cli = cli();
        cli.cmd
            .current_dir(self.path())
            .env("EDEN_BENCH_DATA_DIR", self.path().join("data"))
            .env("EDEN_BENCH_WORK_DIR", self.path().join("work"))
            .env("EDEN_BENCH_OVERLAY", self.path().join("tools/mangohud"))
            .env("EDEN_BENCH_AGGREGATOR", self.path().join("tools/aggregate"))
            .env("EDEN_BENCH_DURATION", "1")
            .env("EDEN_BENCH_WARMUP", "0")
            .env("EDEN_BENCH_POLL_MS", "50")
            .env("EDEN_BENCH_KILL_RETRIES", "5");
        cli
    }

    /// Argument lines the aggregator stand-in was invoked with.
    pub fn aggregator_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path().join("aggregate.calls"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Committed record directories for a build, oldest first.
    pub fn records(&self, build_id: &str) -> Vec<PathBuf> {
        let dir = self.path().join("benchmark-logs").join(GAME_ID).join(build_id);
        let mut records: Vec<PathBuf> = std::fs::read_dir(dir)
            .map(|entries| entries.flatten().map(|e| e.path()).collect())
            .unwrap_or_default();
        records.sort();
        records
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        RunAssert { output }
    }

    /// Run and assert exit code 0.
    pub fn passes(self) -> RunAssert {
        let run = self.run();
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            run.output.status,
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and assert exit code 1.
    pub fn fails(self) -> RunAssert {
        let run = self.run();
        assert_eq!(
            run.output.status.code(),
            Some(1),
            "expected exit 1\nstdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {:?}:\n{}", needle, stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {:?}:\n{}", needle, stderr);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(needle), "stdout unexpectedly has {:?}:\n{}", needle, stdout);
        self
    }
}
