//! Log output for the `alignrank` binary.
//!
//! Human-readable lines go to stderr so stdout stays clean for JSON results
//! piped out of `rank --emit-json` and `sequences`. With `--json` every event
//! is written as one JSON object per line instead.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins over the CLI verbosity when set and parseable.
fn log_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing(json: bool, level: Level) {
    let registry = tracing_subscriber::registry().with(log_filter(level));
    let installed = if json {
        registry
            .with(fmt::layer().with_target(false).json())
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!(event = "telemetry.already_installed");
    }
}
