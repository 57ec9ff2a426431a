pub use tracing::{debug, error, info, instrument, trace, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

/// Filter used when RUST_LOG is unset or invalid.
const DEFAULT_FILTER: &str = "info";

pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Installs the global subscriber. RUST_LOG takes precedence over
/// `default_filter`; span close events (with timings) are logged only
/// when debug output is enabled.
pub fn init_with_default(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let is_debug = {
        let filter = env_filter.to_string();
        filter.contains("debug") || filter.contains("trace")
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
