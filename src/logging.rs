use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "mintcalc=debug,warn"
    } else {
        "mintcalc=info,warn"
    }
}

/// Initialize logging with tracing.
///
/// Reads the filter from `RUST_LOG` when set, otherwise uses
/// [`default_filter`]. Output goes to stderr so results on stdout stay
/// machine-readable.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!("Logging initialized");
}
