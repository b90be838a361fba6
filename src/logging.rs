//! Logging setup for cssopt

use crate::config::constants::DEFAULT_LOG_FILTER;
use crate::error::PipelineResult;
use std::fs::OpenOptions;
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console filter: `RUST_LOG` wins, then `-v`, then the default level
fn console_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { DEFAULT_LOG_FILTER })
    })
}

/// Install the global subscriber.
///
/// Console output goes to stderr so `--json` reports on stdout stay clean.
/// With `log_file` set, a second layer records everything at debug level.
pub fn init(verbose: bool, log_file: Option<&Path>) -> PipelineResult<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_level(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(console_filter(verbose)),
        )
        .with(file_layer)
        .init();

    Ok(())
}
