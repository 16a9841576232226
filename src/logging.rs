//! Diagnostic logging.
//!
//! Logs go to stderr so that stdout carries nothing but the report and can
//! be redirected straight into a `.csv` file. The filter is read from
//! `AUDITFMT_LOG` (same syntax as `RUST_LOG`); otherwise `-v` raises the
//! default `warn` level to `debug` and `-vv` to `trace`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an explicit filter directive.
pub const LOG_ENV: &str = "AUDITFMT_LOG";

/// Default directive for a given `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "auditfmt=debug,warn",
        _ => "auditfmt=trace,info",
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init();
}
