//! Entities: playback state and room snapshots.

use super::value_object::{ClientId, RoomName, Timestamp};

/// Video descriptor carried by a video-load message.
///
/// `mode` and `video_id` pass through exactly as received; the relay does
/// not interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    pub mode: Option<String>,
    pub video_id: Option<String>,
}

/// Last known playback descriptor for a room.
///
/// Created or replaced wholesale when a video-load message arrives;
/// `playing` and `position` are then mutated independently by command and
/// heartbeat messages. Seek messages never touch this state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub video: VideoSource,
    pub playing: bool,
    pub position: f64,
}

impl PlaybackState {
    /// Build the state for a freshly loaded video: paused at position zero.
    pub fn load(video: VideoSource) -> Self {
        Self {
            video,
            playing: false,
            position: 0.0,
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn set_position(&mut self, position: f64) {
        self.position = position;
    }
}

/// A connected client as seen by a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ClientId,
    pub connected_at: Timestamp,
}

/// Point-in-time view of one room, used by the read-only HTTP surface
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub name: RoomName,
    pub participants: Vec<Participant>,
    pub playback: Option<PlaybackState>,
}
