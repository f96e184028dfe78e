//! WebSocket message DTOs.
//!
//! All traffic is JSON objects with a `type` discriminator and camelCase
//! keys. Inbound frames deserialize into [`InboundMessage`]; anything that
//! is not a JSON object with a recognized `type` fails to parse and is
//! dropped by the router. Outbound frames are built from the structs below,
//! except for `video`, `command`, and `heartbeat`, which are rebroadcast as
//! the raw inbound text.

use serde::{Deserialize, Serialize};

/// Message type discriminator for server-to-client messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Connected,
    RoomCreated,
    Participants,
    RoomState,
    Ready,
    Seek,
    LocalMeta,
    ClearVideo,
    Chat,
}

/// Client-to-server messages, dispatched on the `type` field.
///
/// `room` is optional on the wire everywhere; handlers that need it drop the
/// message when it is missing or empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    CreateRoom {
        room: Option<String>,
    },
    Join {
        room: Option<String>,
    },
    Ready {
        room: Option<String>,
        #[serde(default)]
        ready: bool,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        room: Option<String>,
        mode: Option<String>,
        video_id: Option<String>,
    },
    Command {
        room: Option<String>,
        action: Option<String>,
    },
    Seek {
        room: Option<String>,
        position: Option<f64>,
    },
    Heartbeat {
        room: Option<String>,
        #[serde(default)]
        position: f64,
    },
    #[serde(rename_all = "camelCase")]
    LocalMeta {
        room: Option<String>,
        duration: Option<f64>,
        size: Option<u64>,
    },
    ClearVideo {
        room: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Chat {
        room: Option<String>,
        from_name: Option<String>,
        text: Option<String>,
    },
}

/// One-time acknowledgment sent immediately after accept
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub r#type: MessageType,
    pub client_id: String,
}

/// Acknowledgment for `createRoom`, sent to the sender only
#[derive(Debug, Serialize)]
pub struct RoomCreatedMessage {
    pub r#type: MessageType,
    pub room: String,
}

/// Current membership of a room, broadcast after join and leave
#[derive(Debug, Serialize)]
pub struct ParticipantsMessage {
    pub r#type: MessageType,
    pub list: Vec<String>,
}

/// Last known playback state, sent only to a joining client
#[derive(Debug, Serialize)]
pub struct RoomStateMessage {
    pub r#type: MessageType,
    pub state: PlaybackStateDto,
}

#[derive(Debug, Serialize)]
pub struct ReadyMessage {
    pub r#type: MessageType,
    pub from: String,
    pub ready: bool,
}

#[derive(Debug, Serialize)]
pub struct SeekMessage {
    pub r#type: MessageType,
    pub position: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LocalMetaMessage {
    pub r#type: MessageType,
    pub from: String,
    pub duration: Option<f64>,
    pub size: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ClearVideoMessage {
    pub r#type: MessageType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub r#type: MessageType,
    pub from: String,
    pub from_name: Option<String>,
    pub text: Option<String>,
}

/// Wire form of a room's playback state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackStateDto {
    pub video: VideoDto,
    pub playing: bool,
    pub position: f64,
}

/// Wire form of the video descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoDto {
    pub mode: Option<String>,
    pub video_id: Option<String>,
}
