//! CLI command implementations
//!
//! `serve` boot sequence:
//! 1. Configuration resolve (file, then environment)
//! 2. Store open
//! 3. HTTP serve until ctrl-c
//! 4. Store close

use std::path::Path;

use crate::http_server::HttpServer;
use crate::observability::{Event, Logger};
use crate::store::StoreAdapter;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Serve the API until interrupted
pub fn serve(config_path: &Path) -> CliResult<()> {
    Logger::emit(
        Event::BootStart,
        &[("config", &config_path.display().to_string())],
    );

    let config = Config::resolve(config_path)?;
    Logger::emit(
        Event::ConfigLoaded,
        &[
            ("backend", config.store.backend.as_str()),
            ("read_faults", config.read_faults.as_str()),
        ],
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async move {
        let store = config
            .store
            .open()
            .await
            .map_err(|e| CliError::store_unavailable(e.to_string()))?;
        Logger::emit(Event::StoreOpened, &[("backend", store.backend())]);

        let adapter = StoreAdapter::new(store, config.read_faults);
        HttpServer::new(config.http, adapter, config.not_found_status)
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the resolved configuration as JSON
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = Config::resolve(config_path)?;
    write_json(&config)
}
