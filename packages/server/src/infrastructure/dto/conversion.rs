//! Conversion logic between DTOs and domain entities.

use watchroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{Participant, PlaybackState, RoomSnapshot, VideoSource};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<VideoSource> for dto::VideoDto {
    fn from(model: VideoSource) -> Self {
        Self {
            mode: model.mode,
            video_id: model.video_id,
        }
    }
}

impl From<PlaybackState> for dto::PlaybackStateDto {
    fn from(model: PlaybackState) -> Self {
        Self {
            video: model.video.into(),
            playing: model.playing,
            position: model.position,
        }
    }
}

impl From<Participant> for http::ParticipantDetailDto {
    fn from(model: Participant) -> Self {
        Self {
            client_id: model.id.into_string(),
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
        }
    }
}

impl From<RoomSnapshot> for http::RoomSummaryDto {
    fn from(model: RoomSnapshot) -> Self {
        Self {
            room: model.name.into_string(),
            participants: model
                .participants
                .into_iter()
                .map(|p| p.id.into_string())
                .collect(),
            has_playback: model.playback.is_some(),
        }
    }
}

impl From<RoomSnapshot> for http::RoomDetailDto {
    fn from(model: RoomSnapshot) -> Self {
        Self {
            room: model.name.into_string(),
            participants: model.participants.into_iter().map(Into::into).collect(),
            state: model.playback.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, RoomName, Timestamp};

    fn test_playback() -> PlaybackState {
        PlaybackState::load(VideoSource {
            mode: Some("yt".to_string()),
            video_id: Some("v1".to_string()),
        })
    }

    #[test]
    fn test_playback_state_to_dto() {
        // テスト項目: PlaybackState が DTO に変換され JSON 形式が一致する
        // given (前提条件):
        let state = test_playback();

        // when (操作):
        let dto: dto::PlaybackStateDto = state.into();
        let json = serde_json::to_string(&dto).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            r#"{"video":{"mode":"yt","videoId":"v1"},"playing":false,"position":0.0}"#
        );
    }

    #[test]
    fn test_room_snapshot_to_summary_dto() {
        // テスト項目: RoomSnapshot がサマリー DTO に変換される
        // given (前提条件):
        let snapshot = RoomSnapshot {
            name: RoomName::new("x".to_string()).unwrap(),
            participants: vec![Participant {
                id: ClientId::new("alice".to_string()).unwrap(),
                connected_at: Timestamp::new(0),
            }],
            playback: Some(test_playback()),
        };

        // when (操作):
        let dto: http::RoomSummaryDto = snapshot.into();

        // then (期待する結果):
        assert_eq!(dto.room, "x");
        assert_eq!(dto.participants, vec!["alice".to_string()]);
        assert!(dto.has_playback);
    }

    #[test]
    fn test_participant_to_detail_dto_formats_timestamp() {
        // テスト項目: Participant の接続時刻が RFC 3339 形式に変換される
        // given (前提条件):
        let participant = Participant {
            id: ClientId::new("alice".to_string()).unwrap(),
            connected_at: Timestamp::new(0),
        };

        // when (操作):
        let dto: http::ParticipantDetailDto = participant.into();

        // then (期待する結果):
        assert_eq!(dto.client_id, "alice");
        assert_eq!(dto.connected_at, "1970-01-01T00:00:00+00:00");
    }
}
