//! Read-only HTTP API handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::domain::RoomName;
use crate::infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto};

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let summaries = state.registry.room_summaries().await;
    Json(summaries.into_iter().map(Into::into).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room = RoomName::new(room).map_err(|_| StatusCode::NOT_FOUND)?;

    match state.registry.room_detail(&room).await {
        Some(snapshot) => Ok(Json(snapshot.into())),
        None => Err(StatusCode::NOT_FOUND),
    }
}
