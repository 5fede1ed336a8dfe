//! Entity schemas
//!
//! Every entity kind declares its collection, its natural key and the shape
//! of its fields. Inbound payloads are validated against the schema before
//! any storage call:
//!
//! - create: whole payload, required fields enforced, defaults filled
//! - update: partial, only fields present in the payload, no defaults
//! - undeclared fields are dropped, never stored
//! - a failure rejects the whole payload and names the offending field

pub mod entities;
mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use types::{
    DefaultRule, EntitySchema, FieldDef, FieldType, KeySource, KeyType, NaturalKey, RouteStyle,
    STORE_KEY_FIELD,
};
pub use validator::SchemaValidator;
