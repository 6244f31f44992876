//! Command-line tool entry point.
#![deny(missing_docs)]

use clap::Parser;
use tracing::debug;

mod address;
mod cli;
mod config;
mod error;
mod interfaces;
mod logging;
mod resolver;
mod selector;
mod sources;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let app_args = cli::App::parse();
    logging::init(app_args.verbose);

    let config = match config::Config::from_app(app_args) {
        Ok(config) => config,
        Err(err) => exit_with_error(&err),
    };

    match resolver::Resolver::new(config).resolve().await {
        Ok(ips) => {
            for ip in ips {
                println!("{}", ip);
            }
        }
        Err(err) => exit_with_error(&err),
    }
}

/// Prints the error in a single line and exits with a non-zero status.
fn exit_with_error(err: &dyn std::error::Error) -> ! {
    let mut source = err.source();
    while let Some(cause) = source {
        debug!(%cause, "caused by");
        source = cause.source();
    }

    eprintln!("{}", err);
    std::process::exit(1);
}
