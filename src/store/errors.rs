//! Store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Faults raised by a document store backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backend rejected or failed the query
    #[error("query failed: {0}")]
    Query(String),

    /// A writer panicked while holding the collection lock
    #[error("store state poisoned")]
    Poisoned,

    /// Operation issued after `close`
    #[error("store is closed")]
    Closed,
}
