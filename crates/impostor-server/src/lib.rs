//! Impostor server library - HTTP/WebSocket front end for game rooms.
//!
//! Routes, the per-connection WebSocket pump, the connection hub and the
//! application state live here so integration tests can drive them without
//! binding a socket.

pub mod config;
pub mod hub;
pub mod logging;
pub mod routes;
pub mod state;
pub mod websocket;

use axum::{routing::get, Router};
use state::AppState;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// The full application router: REST under `/api`, the socket at `/ws`, and
/// the static frontend as fallback.
pub fn app(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .nest("/api", routes::api_router())
        .route("/ws", get(routes::ws::upgrade))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
