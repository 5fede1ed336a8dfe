//! Service configuration
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. JSON file given by `--config` (skipped when the file does not exist)
//! 3. environment, including a `.env` file in the working directory

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::rest_api::StatusPolicy;
use crate::store::{FaultPolicy, StoreBackend, StoreConfig};

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    /// What a failed read turns into (default: surface)
    #[serde(default)]
    pub read_faults: FaultPolicy,

    #[serde(default)]
    pub not_found_status: StatusPolicy,
}

impl Config {
    /// Load the file (if any), apply process environment, validate
    pub fn resolve(path: &Path) -> CliResult<Self> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();
        Self::resolve_with(path, |name| std::env::var(name).ok())
    }

    fn resolve_with<F>(path: &Path, lookup: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            Self::read(path)?
        } else {
            Self::default()
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Overlay `MONGODB_URI`, `MONGODB_DB_NAME`, `RESTO_HOST` and `RESTO_PORT`
    ///
    /// Setting `MONGODB_URI` selects the mongo backend.
    pub fn apply_env<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MONGODB_URI") {
            self.store.backend = StoreBackend::Mongo;
            self.store.uri = Some(uri);
        }
        if let Some(database) = lookup("MONGODB_DB_NAME") {
            self.store.database = Some(database);
        }
        if let Some(host) = lookup("RESTO_HOST") {
            self.http.host = host;
        }
        if let Some(port) = lookup("RESTO_PORT") {
            self.http.port = port.trim().parse().map_err(|_| {
                CliError::config_error(format!("Invalid RESTO_PORT: '{}'", port))
            })?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }
        self.store.validate().map_err(CliError::config_error)?;
        self.not_found_status
            .validate()
            .map_err(CliError::config_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.http.port, 8000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.read_faults, FaultPolicy::Surface);
        assert_eq!(config.not_found_status.default, 404);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "http": {{ "port": 9100, "cors_origins": [] }},
                "read_faults": "swallow",
                "not_found_status": {{ "overrides": {{ "branch.delete": 400 }} }}
            }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.http.port, 9100);
        assert!(config.http.cors_origins.is_empty());
        assert_eq!(config.read_faults, FaultPolicy::Swallow);
        assert_eq!(config.not_found_status.overrides["branch.delete"], 400);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.message().starts_with("Invalid config JSON"));
    }

    #[test]
    fn test_unknown_fault_policy_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "read_faults": "ignore" }}"#).unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_resolves_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve_with(&dir.path().join("absent.json"), env(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "http": {{ "port": 9100 }} }}"#).unwrap();

        let config = Config::resolve_with(file.path(), env(&[("RESTO_PORT", "9200")])).unwrap();
        assert_eq!(config.http.port, 9200);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("MONGODB_URI", "mongodb://db:27017"),
                ("MONGODB_DB_NAME", "resto"),
                ("RESTO_HOST", "127.0.0.1"),
                ("RESTO_PORT", "9000"),
            ]))
            .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Mongo);
        assert_eq!(config.store.uri.as_deref(), Some("mongodb://db:27017"));
        assert_eq!(config.store.database.as_deref(), Some("resto"));
        assert_eq!(config.http.socket_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_bad_port_env() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("RESTO_PORT", "eighty")])).unwrap_err();
        assert!(err.message().contains("RESTO_PORT"));
    }

    #[test]
    fn test_mongo_without_database_fails_validation() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("MONGODB_URI", "mongodb://db:27017")]))
            .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_status_fails_validation() {
        let mut config = Config::default();
        config.not_found_status.default = 200;
        assert!(config.validate().is_err());
    }
}
