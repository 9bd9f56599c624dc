//! `GET /health`, served outside `/api` without an API key.
//!
//! Reports the crate version and which collection the API serves. It does
//! not touch the store.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub collection: String,
}

impl HealthResponse {
    fn ok(collection: &str) -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            collection: collection.to_string(),
        }
    }
}

/// Health route for the API serving `collection`
pub fn health_routes(collection: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(Arc::<str>::from(collection))
}

async fn health_handler(State(collection): State<Arc<str>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(&collection))
}
