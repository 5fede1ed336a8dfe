//! Observability for resto-api
//!
//! Structured JSON logs, one line per event. Every log line carries a typed
//! [`Event`] name so operators can grep for store faults or rejected payloads
//! without parsing free-form text.
//!
//! ```ignore
//! use resto_api::observability::{Event, Logger};
//!
//! Logger::emit(Event::StoreOpened, &[("backend", "memory")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
