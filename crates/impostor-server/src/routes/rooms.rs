//! Room listing and creation routes.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use impostor_types::{RoomId, RoomSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomSummary>,
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<RoomListResponse> {
    Json(RoomListResponse {
        rooms: state.coordinator.list_rooms(),
    })
}

#[derive(Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize)]
pub struct CreateRoomResponse {
    pub room_id: RoomId,
}

/// Create a room. Connected clients receive the new room list.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRoomRequest>,
) -> (StatusCode, Json<CreateRoomResponse>) {
    let room_id = state.coordinator.create_room(&req.title);
    info!(target: "impostor::api", "Created room {} via HTTP", room_id);

    (StatusCode::CREATED, Json(CreateRoomResponse { room_id }))
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Categories offered when a vote opens.
pub async fn categories(State(state): State<Arc<AppState>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.coordinator.categories().to_vec(),
    })
}
