// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment contract of the performance-overlay logger.

use std::path::Path;

use eb_core::CaptureWindow;

/// Enables the overlay layer.
pub const ENABLE_VAR: &str = "MANGOHUD";
/// Enables its CSV logger.
pub const LOG_VAR: &str = "MANGOHUD_LOG";
/// Structured `key=value,...` configuration.
pub const CONFIG_VAR: &str = "MANGOHUD_CONFIG";

/// Environment that makes the overlay log into `output_dir`, starting after
/// the warm-up and recording for the rest of the capture window.
pub fn overlay_env(output_dir: &Path, window: &CaptureWindow) -> Vec<(String, String)> {
    vec![
        (ENABLE_VAR.to_string(), "1".to_string()),
        (LOG_VAR.to_string(), "1".to_string()),
        (CONFIG_VAR.to_string(), config_string(output_dir, window)),
    ]
}

pub fn config_string(output_dir: &Path, window: &CaptureWindow) -> String {
    format!(
        "output_folder={},log_duration={},autostart_log={}",
        output_dir.display(),
        window.active().as_secs(),
        window.warmup.as_secs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn config_string_splits_window_into_warmup_and_capture() {
        let window = CaptureWindow::new(
            Duration::from_secs(65),
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            config_string(&PathBuf::from("/tmp/run"), &window),
            "output_folder=/tmp/run,log_duration=60,autostart_log=5"
        );
    }

    #[test]
    fn env_sets_enable_and_logging_flags() {
        let env = overlay_env(Path::new("/x"), &CaptureWindow::default());
        let keys: Vec<_> = env.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["MANGOHUD", "MANGOHUD_LOG", "MANGOHUD_CONFIG"]);
        assert_eq!(env[0].1, "1");
        assert_eq!(env[1].1, "1");
    }
}
