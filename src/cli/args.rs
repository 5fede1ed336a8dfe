//! CLI argument definitions using clap
//!
//! Commands:
//! - resto-api serve --config <path>
//! - resto-api check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Restaurant management API over a document store
#[derive(Parser, Debug)]
#[command(name = "resto-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the store and serve HTTP until interrupted
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./resto.json")]
        config: PathBuf,
    },

    /// Print the resolved configuration and exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./resto.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
