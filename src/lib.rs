//! # resto-api
//!
//! Restaurant management CRUD over a document store.
//!
//! Request flow: [`schema`] validates the payload, [`store`] runs one
//! operation against a collection, [`normalize`] turns stored values into
//! JSON. [`rest_api`] wires the three per entity kind and [`http_server`]
//! serves the result.

pub mod cli;
pub mod http_server;
pub mod normalize;
pub mod observability;
pub mod rest_api;
pub mod schema;
pub mod store;
