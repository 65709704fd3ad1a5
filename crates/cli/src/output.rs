// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Final report rendering (text table or JSON).

use clap::ValueEnum;
use eb_core::{format_elapsed, AggregatorStdout, Candidate};
use eb_engine::{BatchReport, RunEntry, RunVerdict, VerdictKind};
use serde::Serialize;

use crate::color;
use crate::logging::Sink;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Where diagnostics go so they never interleave with a JSON document.
    pub fn diagnostics(self) -> Sink {
        match self {
            OutputFormat::Text => Sink::Stdout,
            OutputFormat::Json => Sink::Stderr,
        }
    }

    /// The aggregator's own stdout follows the same rule.
    pub fn aggregator_stdout(self) -> AggregatorStdout {
        match self.diagnostics() {
            Sink::Stdout => AggregatorStdout::Inherit,
            Sink::Stderr => AggregatorStdout::Stderr,
        }
    }
}

/// Print any serializable value as pretty JSON.
fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `--dry-run` listing
pub fn print_candidates(candidates: &[Candidate], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(candidates),
        OutputFormat::Text => {
            print!("{}", format_candidates(candidates));
            Ok(())
        }
    }
}

pub fn format_candidates(candidates: &[Candidate]) -> String {
    let width = candidates.iter().map(|c| c.build_id.as_str().len()).max().unwrap_or(0);
    let mut out = format!("{}\n", color::header(&format!("{} executable(s)", candidates.len())));
    for c in candidates {
        out.push_str(&format!(
            "  {:<9}  {:<width$}  {}\n",
            c.kind(),
            c.build_id.as_str(),
            color::context(&c.path.display().to_string()),
        ));
    }
    out
}

pub fn print_report(report: &BatchReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            print!("{}", format_report(report));
            Ok(())
        }
    }
}

pub fn format_report(report: &BatchReport) -> String {
    let width = report.runs.iter().map(|r| r.build_id.as_str().len()).max().unwrap_or(0);
    let mut out = format!(
        "{}\n",
        color::header(&format!(
            "{} run(s): {} committed, {} died, {} unclassified, {} skipped",
            report.runs.len(),
            report.count(VerdictKind::Committed),
            report.count(VerdictKind::Died),
            report.count(VerdictKind::Unclassified),
            report.count(VerdictKind::Skipped),
        ))
    );
    for run in &report.runs {
        let line = format!("  {:<12}  {:<width$}  {}", run.verdict.to_string(), run.build_id.as_str(), detail(run));
        let line = match run.verdict {
            RunVerdict::Committed { .. } => color::literal(&line),
            _ => color::muted(&line),
        };
        out.push_str(&line);
        out.push('\n');
    }
    match &report.handoff {
        Some(handoff) => out.push_str(&format!(
            "{} {}\n",
            color::context("aggregator exit:"),
            handoff.exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string())
        )),
        None => out.push_str(&format!("{}\n", color::context("aggregator: not run"))),
    }
    out
}

fn detail(run: &RunEntry) -> String {
    match &run.verdict {
        RunVerdict::Committed { record } => {
            format!("{} -> {}", record.workload, record.dir.display())
        }
        RunVerdict::Unclassified { reason, work_dir } => {
            format!("{} (kept in {})", reason, work_dir.display())
        }
        RunVerdict::Died { elapsed, .. } => format!("exited after {}", format_elapsed(*elapsed)),
        RunVerdict::Skipped { reason } => reason.clone(),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
