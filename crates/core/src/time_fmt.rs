// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamp labels and human-readable durations.

use chrono::{DateTime, Local, TimeZone};
use std::time::Duration;

/// Directory-name format for a run's start time (second granularity).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Local-time label for a run started at `epoch_ms`.
pub fn timestamp_label(epoch_ms: u64) -> String {
    timestamp_label_in(&Local, epoch_ms)
}

/// Label in an explicit time zone.
pub fn timestamp_label_in<Tz: TimeZone>(tz: &Tz, epoch_ms: u64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp_millis(epoch_ms as i64).unwrap_or_default();
    utc.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

/// Format elapsed time as a compact string ("45s", "1m05s", "2h03m").
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
