//! Store configuration and backend selection

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::{DocumentStore, MemoryStore};

/// Which backend serves the collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Mongo,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Mongo => "mongo",
        }
    }
}

/// Store section of the service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Connection string (mongo only)
    #[serde(default)]
    pub uri: Option<String>,

    /// Database name (mongo only)
    #[serde(default)]
    pub database: Option<String>,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    /// Check the section is usable by this build
    pub fn validate(&self) -> Result<(), String> {
        match self.backend {
            StoreBackend::Memory => Ok(()),
            StoreBackend::Mongo => {
                if !cfg!(feature = "mongo") {
                    return Err("store.backend 'mongo' requires the 'mongo' feature".to_string());
                }
                if self.uri.as_deref().map_or(true, str::is_empty) {
                    return Err("store.uri is required for the mongo backend".to_string());
                }
                if self.database.as_deref().map_or(true, str::is_empty) {
                    return Err("store.database is required for the mongo backend".to_string());
                }
                Ok(())
            }
        }
    }

    /// Open the configured backend
    pub async fn open(&self) -> StoreResult<Arc<dyn DocumentStore>> {
        match self.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreBackend::Mongo => self.open_mongo().await,
        }
    }

    #[cfg(feature = "mongo")]
    async fn open_mongo(&self) -> StoreResult<Arc<dyn DocumentStore>> {
        let (Some(uri), Some(database)) = (self.uri.as_deref(), self.database.as_deref()) else {
            return Err(StoreError::Unavailable(
                "mongo backend needs uri and database".to_string(),
            ));
        };
        let store = super::MongoStore::connect(uri, database).await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "mongo"))]
    async fn open_mongo(&self) -> StoreResult<Arc<dyn DocumentStore>> {
        Err(StoreError::Unavailable(
            "built without the 'mongo' feature".to_string(),
        ))
    }
}
