//! # REST API Routes
//!
//! Per entity kind with route segment `e` and list segment `es`:
//! - `POST /create-e` and `/create-e/`
//! - `GET|PUT|DELETE /e/:id`
//! - `GET /es` and `/es/`
//!
//! Resource-style kinds (the `/admin/...` records) use `POST|GET /e` and
//! `GET|PUT|DELETE /e/:id`, where `:id` is the store-assigned id.
//!
//! Plus `/register`, `/registrations` and `/collections`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::schema::{EntitySchema, RouteStyle};
use crate::store::StoreAdapter;

use super::errors::{ApiError, ApiResult};
use super::handler::CrudHandler;
use super::registration::{RegisteredUser, RegistrationForm, Registrations};
use super::response::{CollectionsResponse, CreatedResponse, MessageResponse};
use super::status::StatusPolicy;

/// Build the router for every entity in `schemas` plus the auxiliary routes
pub fn api_routes(
    schemas: Vec<EntitySchema>,
    store: StoreAdapter,
    statuses: Arc<StatusPolicy>,
) -> Router {
    let entities = schemas
        .into_iter()
        .map(|schema| Arc::new(CrudHandler::new(schema, store.clone(), statuses.clone())))
        .fold(Router::new(), |router, handler| router.merge(entity_routes(handler)));

    entities
        .merge(registration_routes(Registrations::new(store.clone())))
        .merge(
            Router::new()
                .route("/collections", get(collections_handler))
                .with_state(store),
        )
}

/// Routes for one entity kind
pub fn entity_routes(handler: Arc<CrudHandler>) -> Router {
    let schema = handler.schema();
    let single = format!("/{}/:id", schema.path);
    let router = Router::new().route(
        &single,
        get(get_handler).put(update_handler).delete(delete_handler),
    );

    let router = match schema.routes {
        RouteStyle::Action => {
            let create = format!("/create-{}", schema.path);
            let list = format!("/{}", schema.list_path);
            router
                .route(&create, post(create_handler))
                .route(&format!("{}/", create), post(create_handler))
                .route(&list, get(list_handler))
                .route(&format!("{}/", list), get(list_handler))
        }
        RouteStyle::Resource => {
            let collection = format!("/{}", schema.path);
            router
                .route(&collection, post(create_handler).get(list_handler))
                .route(&format!("{}/", collection), post(create_handler).get(list_handler))
        }
    };

    router.with_state(handler)
}

fn registration_routes(registrations: Registrations) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/registrations", get(registrations_handler))
        .with_state(registrations)
}

type HandlerState = State<Arc<CrudHandler>>;

fn body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn create_handler(
    State(handler): HandlerState,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let payload = body(payload)?;
    Ok(Json(handler.create(&payload).await?))
}

async fn get_handler(
    State(handler): HandlerState,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(handler.get(&id).await?))
}

async fn update_handler(
    State(handler): HandlerState,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let payload = body(payload)?;
    Ok(Json(handler.update(&id, &payload).await?))
}

async fn delete_handler(
    State(handler): HandlerState,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(handler.delete(&id).await?))
}

async fn list_handler(State(handler): HandlerState) -> ApiResult<Json<Value>> {
    Ok(Json(handler.list().await?))
}

async fn register_handler(
    State(registrations): State<Registrations>,
    form: Result<Json<RegistrationForm>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(form) = form.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Json(registrations.register(form).await?))
}

async fn registrations_handler(
    State(registrations): State<Registrations>,
) -> ApiResult<Json<Vec<RegisteredUser>>> {
    Ok(Json(registrations.list().await?))
}

async fn collections_handler(
    State(store): State<StoreAdapter>,
) -> ApiResult<Json<CollectionsResponse>> {
    let collections = store.collection_names().await?;
    Ok(Json(CollectionsResponse { collections }))
}
