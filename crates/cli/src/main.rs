// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! eden-bench: run every discovered emulator build under the performance
//! overlay, file the captures by workload, and hand them to the comparison
//! tool.

mod color;
mod env;
mod exit_error;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use eb_adapters::LocalProcessAdapter;
use eb_core::SystemClock;
use eb_engine::{discover, orchestrate, preflight};

use crate::exit_error::{exit_code, ExitError};
use crate::output::OutputFormat;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser, Debug)]
#[command(
    name = "eden-bench",
    version = VERSION,
    about = "Benchmark every eden build under the performance overlay",
    long_about = "Discovers eden builds under EDEN_BUILD_DIR and EDEN_ARTIFACTS_DIR, runs \
                  each one under the performance overlay, files the captures under \
                  EDEN_BENCH_LOG_DIR by workload and build, then runs the comparison tool \
                  once over the whole tree. Settings come from EDEN_BENCH_* variables.",
    styles = color::styles(),
)]
struct Cli {
    /// Check tools and list discovered builds without running anything
    #[arg(long)]
    dry_run: bool,

    /// Report format
    #[arg(long, short = 'o', value_enum, default_value_t)]
    output: OutputFormat,
}

fn main() {
    let cli = Cli::parse();
    let sink = cli.output.diagnostics();
    logging::init(&env::log_filter(), sink);

    if let Err(err) = run(&cli) {
        logging::print_error(sink, &format!("{:#}", err));
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = env::load()
        .map_err(|e| ExitError::fatal(format!("invalid configuration: {}", e)))?
        .aggregator_stdout(cli.output.aggregator_stdout());
    preflight::require_tools(&config).map_err(|e| ExitError::fatal(e.to_string()))?;

    if cli.dry_run {
        let candidates = discover(&config).map_err(|e| ExitError::fatal(e.to_string()))?;
        return output::print_candidates(&candidates, cli.output);
    }

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let report = runtime
        .block_on(orchestrate(&config, LocalProcessAdapter::new(), SystemClock))
        .map_err(|e| ExitError::fatal(e.to_string()))?;
    output::print_report(&report, cli.output)
}
