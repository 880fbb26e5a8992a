use crate::config::LogFormat;
use tracing::debug;
use tracing_subscriber::{prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "embedbase=info,warn";

/// Installs the global tracing subscriber for the binary.
///
/// `RUST_LOG` overrides the default filter. Logs go to stderr so command
/// output on stdout stays machine-readable. Calling this twice is harmless.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(filter)
            .try_init(),
    };

    if result.is_err() {
        debug!("tracing already initialized");
    }
}
