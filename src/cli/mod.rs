//! CLI module
//!
//! Provides command-line interface for:
//! - serve: open the store and serve HTTP
//! - check-config: print the resolved configuration

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
