// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! eb-engine: Discovery, supervision, classification and handoff
//!
//! ```text
//! preflight ─> discover ─> for each candidate (sequential):
//!                              supervise ─> classify ─> commit
//!                          ─> hand off to aggregator
//! ```

pub mod batch;
pub mod cache;
pub mod classifier;
pub mod discovery;
pub mod handoff;
pub mod overlay;
pub mod permissions;
pub mod preflight;
pub mod supervisor;
pub mod version;

pub use batch::{orchestrate, Batch, BatchError, BatchReport, RunEntry, RunVerdict, VerdictKind};
pub use classifier::{ClassifyError, LogRecord};
pub use discovery::{discover, DiscoveryError};
pub use handoff::{HandoffError, HandoffResult};
pub use preflight::PreflightError;
pub use supervisor::{RunSession, Supervisor, SupervisorError};
