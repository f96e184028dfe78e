//! HTTP API response DTOs.

use serde::Serialize;

use super::websocket::PlaybackStateDto;

/// Summary of one room for `GET /api/rooms`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room: String,
    pub participants: Vec<String>,
    pub has_playback: bool,
}

/// Detail of one room for `GET /api/rooms/{room}`
#[derive(Debug, Serialize)]
pub struct RoomDetailDto {
    pub room: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub state: Option<PlaybackStateDto>,
}

/// One participant entry in a room detail response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub client_id: String,
    pub connected_at: String,
}
