//! # Document normalization
//!
//! Converts between the storage representation of a document (BSON with
//! opaque object ids and raw byte payloads) and its transport representation
//! (JSON with string identifiers).
//!
//! - [`render`]: storage → transport, applied recursively to whole documents
//! - [`encode`]: transport → storage, scoped to named reference fields
//! - [`key`]: the identifier union shared by both directions
//!
//! # Lossy byte payloads
//!
//! A byte payload that happens to be valid UTF-8 renders as the decoded text,
//! not as base64. Reading such a document back therefore yields a string that
//! no longer round-trips to the original bytes through the write path. Only
//! payloads that fail UTF-8 decoding render as base64.

pub mod encode;
pub mod key;
pub mod render;

pub use encode::{bytes_value, encode_binary_refs, json_to_bson, EncodeError};
pub use key::{DocKey, KeyError};
pub use render::{render_bytes, render_document, render_documents, render_value};
