//! Tracing setup.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global subscriber.
///
/// `GRAPHMRS_LOG` takes the usual `EnvFilter` syntax
/// (`GRAPHMRS_LOG=graphmrs_convert=debug`); without it only `info` and above
/// from this workspace are shown. `verbose` raises the default to `debug`.
/// Logs go to stderr so stdout stays machine-readable. Safe to call twice.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose { "graphmrs=debug" } else { "graphmrs=info" };
        let filter =
            EnvFilter::try_from_env("GRAPHMRS_LOG").unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
