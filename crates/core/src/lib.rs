// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! eb-core: Domain types for the eden-bench build-run supervisor

pub mod macros;

pub mod build;
pub mod clock;
pub mod config;
pub mod product;
pub mod run;
pub mod time_fmt;
pub mod workload;

pub use build::{base_name, BuildId, Candidate};
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use clock::{Clock, SystemClock};
pub use config::{
    AggregatorCommand, AggregatorStdout, CaptureWindow, Config, ConfigError, DiscoveryRoot,
    KillPolicy, OutlierFilter,
};
pub use product::PRODUCT_NAME;
pub use run::{RunOutcome, RunState};
pub use time_fmt::{format_elapsed, timestamp_label};
pub use workload::Workload;
