use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a `-v` count. `quiet` wins over any count.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "rezip=error";
    }

    match verbose {
        0 => "rezip=warn",
        1 => "rezip=info",
        2 => "rezip=debug",
        _ => "rezip=trace",
    }
}

/// Installs the global subscriber, writing to stderr so stdout stays clean
/// for status lines and JSON. `RUST_LOG` overrides the verbosity flags.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init()
        .ok();
}
