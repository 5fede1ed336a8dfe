//! Observable events
//!
//! Events are explicit and typed. Each carries a default severity so call
//! sites only name what happened.

use std::fmt;

use super::logger::Severity;

/// Observable events in resto-api
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration resolved
    ConfigLoaded,
    /// Store handle opened
    StoreOpened,
    /// HTTP listener bound, ready for requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Store handle closed
    StoreClosed,
    /// Process finished shutting down
    ShutdownComplete,

    // Request handling
    /// Payload rejected by the entity schema
    ValidationRejected,
    /// Document inserted
    DocumentCreated,
    /// Document updated
    DocumentUpdated,
    /// Document deleted
    DocumentDeleted,

    // Store faults
    /// Insert failed at the store
    InsertFailed,
    /// Single-document lookup failed at the store
    FindFailed,
    /// Update failed at the store
    UpdateFailed,
    /// Delete failed at the store
    DeleteFailed,
    /// Collection scan failed at the store
    ListFailed,
    /// A read fault was swallowed and reported as an empty result
    ReadFaultSwallowed,
    /// Store handle failed to close at shutdown
    StoreCloseFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "RESTO_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::Serving => "RESTO_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::StoreClosed => "STORE_CLOSED",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::DocumentCreated => "DOCUMENT_CREATED",
            Event::DocumentUpdated => "DOCUMENT_UPDATED",
            Event::DocumentDeleted => "DOCUMENT_DELETED",

            Event::InsertFailed => "STORE_INSERT_FAILED",
            Event::FindFailed => "STORE_FIND_FAILED",
            Event::UpdateFailed => "STORE_UPDATE_FAILED",
            Event::DeleteFailed => "STORE_DELETE_FAILED",
            Event::ListFailed => "STORE_LIST_FAILED",
            Event::ReadFaultSwallowed => "READ_FAULT_SWALLOWED",
            Event::StoreCloseFailed => "STORE_CLOSE_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::DocumentCreated | Event::DocumentUpdated | Event::DocumentDeleted => {
                Severity::Trace
            }
            Event::ValidationRejected | Event::ReadFaultSwallowed => Severity::Warn,
            Event::InsertFailed
            | Event::FindFailed
            | Event::UpdateFailed
            | Event::DeleteFailed
            | Event::ListFailed
            | Event::StoreCloseFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
