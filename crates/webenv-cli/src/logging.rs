//! Logging initialization for the CLI.
//!
//! The CLI owns the subscriber; library crates only emit events. Output goes
//! to stderr so `--json` command output on stdout stays parseable.

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events follow the `-v` flag.
const OWN_TARGETS: &[&str] = &["webenv_core", "webenv"];

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// `RUST_LOG` (warn by default) plus our own crates at the `-v` level.
fn build_filter(verbosity: u8) -> EnvFilter {
    let level = level_for(verbosity);
    OWN_TARGETS.iter().fold(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
        |filter, target| match format!("{target}={level}").parse::<Directive>() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}

/// Install the global subscriber.
///
/// `verbosity` 0 is INFO, 1 DEBUG, 2+ TRACE. With `json`, events are written
/// as JSON lines including the current span.
pub fn init(verbosity: u8, json: bool) {
    let registry = tracing_subscriber::registry().with(build_filter(verbosity));

    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = installed {
        eprintln!("warning: logging already initialized: {e}");
    }
}
