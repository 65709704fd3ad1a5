// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostics subscriber: one prefixed line per event.
//!
//! Lines go to stdout next to the text report. With a JSON report on stdout
//! they move to stderr so the document stays parseable.
//!
//! ```text
//! [eden-bench] run 1/3 build_id=build1_bin kind=candidate path=build/bin/eden
//! [eden-bench] warn: skipping run build_id=nightly reason=not executable
//! ```

use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

pub const PREFIX: &str = "[eden-bench]";

/// Stream diagnostics are written to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    Stderr,
}

/// Event formatter writing `PREFIX [level: ]message fields`. Info lines carry
/// no level tag.
pub struct Prefixed;

impl<S, N> FormatEvent<S, N> for Prefixed
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{} ", PREFIX)?;
        let level = *event.metadata().level();
        if level != Level::INFO {
            write!(writer, "{}: ", level.to_string().to_ascii_lowercase())?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(directive: &str, sink: Sink) {
    match sink {
        Sink::Stdout => init_with_writer(directive, std::io::stdout),
        Sink::Stderr => init_with_writer(directive, std::io::stderr),
    }
}

pub fn init_with_writer<W>(directive: &str, writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directive))
        .with_writer(writer)
        .with_ansi(false)
        .event_format(Prefixed)
        .try_init();
}

/// Print a diagnostic outside the subscriber (before it exists, or for the
/// final fatal error).
pub fn print_error(sink: Sink, message: &str) {
    match sink {
        Sink::Stdout => println!("{} error: {}", PREFIX, message),
        Sink::Stderr => eprintln!("{} error: {}", PREFIX, message),
    }
}
