//! # HTTP Server Module
//!
//! Axum app serving the restaurant API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/create-*`, `/<entity>/:id`, `/<entities>` - Entity CRUD
//! - `/register`, `/registrations` - Sign-up
//! - `/collections` - Collections holding documents

pub mod config;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
