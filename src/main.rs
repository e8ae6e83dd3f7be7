//! lastfm-api - command-line front end for the Last.fm client library.
//!
//! Useful for checking signatures, inspecting request URLs, poking at API
//! methods, and completing the desktop auth handshake to obtain a session
//! key.

mod cli;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("lastfm_api=info".parse()?))
        .init();

    cli::run_command(&args)
}
