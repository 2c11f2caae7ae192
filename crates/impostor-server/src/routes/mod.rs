//! HTTP route handlers.

pub mod rooms;
pub mod ws;

use crate::state::AppState;
use axum::{
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// REST endpoints, mounted under `/api`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rooms", get(rooms::list).post(rooms::create))
        .route("/categories", get(rooms::categories))
        .route("/health", get(health))
}
