//! # REST API Module
//!
//! HTTP endpoints for create/read/update/delete over the entity catalog,
//! one generic handler per entity kind.

pub mod errors;
pub mod handler;
pub mod registration;
pub mod response;
pub mod server;
pub mod status;

pub use errors::{ApiError, ApiResult};
pub use handler::CrudHandler;
pub use registration::{RegisteredUser, RegistrationForm, Registrations};
pub use server::{api_routes, entity_routes};
pub use status::{Operation, StatusPolicy};
