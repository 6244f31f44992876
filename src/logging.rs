//! Logging set up. Logs go to stderr so stdout only has the addresses.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Returns the filter directives for the number of times that the verbose
/// flag was indicated. Dependencies only log errors.
fn directives(verbosity: usize) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    format!("error,myip={}", level)
}

/// Installs the global subscriber; `RUST_LOG` takes precedence over
/// `verbosity`.
pub fn init(verbosity: usize) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
