//! # HTTP Server
//!
//! Combines the entity routes, auxiliary routes and CORS into one axum app
//! and owns the store lifecycle: the store handed in is closed after the
//! listener drains.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use crate::observability::{Event, Logger};
use crate::rest_api::{api_routes, StatusPolicy};
use crate::schema::{entities, EntitySchema};
use crate::store::StoreAdapter;

/// HTTP server for the restaurant API
pub struct HttpServer {
    config: HttpServerConfig,
    store: StoreAdapter,
    router: Router,
}

impl HttpServer {
    /// Serve the full entity catalog
    pub fn new(config: HttpServerConfig, store: StoreAdapter, statuses: StatusPolicy) -> Self {
        let router = Self::build_router(&config, &store, statuses, entities::all());
        Self {
            config,
            store,
            router,
        }
    }

    fn build_router(
        config: &HttpServerConfig,
        store: &StoreAdapter,
        statuses: StatusPolicy,
        schemas: Vec<EntitySchema>,
    ) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes(store.clone()))
            .merge(api_routes(schemas, store.clone(), Arc::new(statuses)))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until ctrl-c, then close the store
    pub async fn start(self) -> Result<(), std::io::Error> {
        self.start_with_shutdown(async {
            // A failed signal hook leaves no way to stop gracefully; shut down now.
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    /// Serve until `shutdown` resolves, then close the store
    pub async fn start_with_shutdown<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        Logger::emit(
            Event::Serving,
            &[("addr", &addr.to_string()), ("backend", self.store.backend())],
        );

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                Logger::emit(Event::ShutdownStart, &[]);
            })
            .await;

        if let Err(e) = self.store.close().await {
            Logger::emit(Event::StoreCloseFailed, &[("error", &e.to_string())]);
        }
        Logger::emit(Event::ShutdownComplete, &[]);

        served
    }
}
