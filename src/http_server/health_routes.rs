//! Health check route

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::store::StoreAdapter;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub version: String,
}

/// `GET /health`
pub fn health_routes(store: StoreAdapter) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(store)
}

async fn health_handler(State(store): State<StoreAdapter>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        backend: store.backend().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            backend: "memory".to_string(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["backend"], "memory");
    }
}
