// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run state machine and outcomes.
//!
//! ```text
//! Starting ─┬─> WarmingUp ─> Capturing ─┬─> Succeeded
//!           │                           └─> Died
//!           └─> Skipped
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Lifecycle of one supervised run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Starting,
    WarmingUp,
    Capturing,
    Succeeded,
    Died,
    Skipped,
}

crate::simple_display! {
    RunState {
        Starting => "starting",
        WarmingUp => "warming_up",
        Capturing => "capturing",
        Succeeded => "succeeded",
        Died => "died",
        Skipped => "skipped",
    }
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Died | RunState::Skipped)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Starting, WarmingUp)
                | (Starting, Skipped)
                | (WarmingUp, Capturing)
                | (Capturing, Succeeded)
                | (Capturing, Died)
        )
    }
}

/// How a supervised run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Never launched
    Skipped { reason: String },
    /// Exited before the completion artifact appeared
    Died {
        #[serde(with = "duration_secs")]
        elapsed: Duration,
    },
    /// Completion artifact observed and the process tree terminated
    Succeeded { artifact: PathBuf },
}

crate::simple_display! {
    RunOutcome {
        Skipped { .. } => "skipped",
        Died { .. } => "died",
        Succeeded { .. } => "succeeded",
    }
}

impl RunOutcome {
    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Skipped { .. } => RunState::Skipped,
            RunOutcome::Died { .. } => RunState::Died,
            RunOutcome::Succeeded { .. } => RunState::Succeeded,
        }
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
