//! Shared helpers for driving the router in-process

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use resto_api::http_server::{HttpServer, HttpServerConfig};
use resto_api::rest_api::StatusPolicy;
use resto_api::store::{DocumentStore, FaultPolicy, MemoryStore, StoreAdapter};
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn app_with(store: Arc<dyn DocumentStore>, faults: FaultPolicy, statuses: StatusPolicy) -> Router {
    let adapter = StoreAdapter::new(store, faults);
    HttpServer::new(HttpServerConfig::default(), adapter, statuses).router()
}

pub fn app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    let router = app_with(store.clone(), FaultPolicy::Surface, StatusPolicy::default());
    (store, router)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn branch(id: i64, name: &str) -> Value {
    json!({
        "branch_id": id,
        "branch_name": name,
        "branch_email": "a@example.com",
        "branch_phone": "555-0100",
        "branch_website": "https://example.com/a",
        "branch_desc": "Downtown",
        "branch_active": true,
        "restaurants_id": null,
        "address_id": null
    })
}

pub fn restaurant(id: i64) -> Value {
    json!({
        "restaurants_id": id,
        "res_name": "Trattoria",
        "res_email": "t@example.com",
        "res_website": "https://example.com/t",
        "res_desc": "Pasta",
        "res_active": true,
        "city_id": "c1",
        "state_id": "s1"
    })
}

pub fn menu_item(id: &str) -> Value {
    json!({
        "item_id": id,
        "name": "Soup",
        "description": "Tomato",
        "price": 4.5,
        "category": "starter",
        "available": true
    })
}

pub fn order(id: &str) -> Value {
    json!({
        "order_id": id,
        "customer": { "name": "Ada", "phone": "555-0101" },
        "order_type": "delivery",
        "store": { "branch_id": 1, "name": "Branch A" },
        "items": [
            { "item_id": "m1", "qty": 2 },
            { "item_id": "m2", "qty": 1 }
        ],
        "total_price": 13.5,
        "payment_method": "card",
        "order_status": "pending",
        "order_date": "2024-03-01T12:30:00Z"
    })
}
