//! CLI module for the listings service
//!
//! Provides command-line interface for:
//! - serve: Boot the store and the HTTP API
//! - search: One-shot search over the seeded store
//! - explain: Show how a search would be planned

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, SearchArgs};
pub use commands::{build_store, explain, run, run_command, search, serve, LOG_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_text};
