// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed names shared with the emulator, the overlay logger and the
//! aggregator. The aggregator locates data by these exact names.

use std::path::{Path, PathBuf};

/// Generic executable name of the product. Builds with this base name are
/// identified by their parent directory instead.
pub const PRODUCT_NAME: &str = "eden";

/// Side-channel version reporter shipped next to the main executable.
pub const VERSION_REPORTER: &str = "eden-cli";

/// Dedicated multiplayer server built alongside the emulator. It never
/// loads a workload and never exits on its own.
pub const ROOM_SERVER: &str = "eden-room";

/// Executables in a build tree that share the product prefix but are not
/// emulator builds.
pub const COMPANION_BINARIES: &[&str] = &[VERSION_REPORTER, ROOM_SERVER];

/// Sidecar holding the version reporter's output (or the build id).
pub const VERSION_FILE: &str = "eden-cli-version.txt";

/// Sidecar holding the workload's display name.
pub const GAME_NAME_FILE: &str = "eden-cli-game-name.txt";

/// Sidecar holding the workload's hex id.
pub const GAME_ID_FILE: &str = "eden-cli-game-id.txt";

/// Glob matching the overlay logger's completion artifact.
pub const SUMMARY_PATTERN: &str = "*_summary.csv";

/// Suffix appended to reference build identifiers.
pub const REFERENCE_SUFFIX: &str = "_master";

/// Root of the emulator's per-user data (`{data_dir}/eden`).
pub fn product_data_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(PRODUCT_NAME)
}

/// Emulator's persistent runtime log.
pub fn runtime_log_path(data_dir: &Path) -> PathBuf {
    product_data_dir(data_dir).join("log").join("eden_log.txt")
}

/// Emulator's shader/pipeline cache, cleared before every run.
pub fn shader_cache_dir(data_dir: &Path) -> PathBuf {
    product_data_dir(data_dir).join("shader")
}
