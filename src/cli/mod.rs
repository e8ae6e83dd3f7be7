//! Command-line interface for lastfm-api.
//!
//! Thin glue over the library: every command builds an argument bag and
//! runs it through the same pipeline library callers use.

mod commands;

pub use commands::{Cli, run_command};
