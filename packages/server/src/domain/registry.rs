//! Registry trait definition.
//!
//! The domain layer defines the interface the handlers need for connection,
//! room, and playback bookkeeping; the concrete implementation lives in the
//! infrastructure layer (dependency inversion).

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

use super::{
    entity::{PlaybackState, RoomSnapshot, VideoSource},
    error::PushError,
    value_object::{ClientId, RoomName},
};

/// Channel used to push outbound text frames to one client.
///
/// The receiving half is drained by that connection's pusher task; a closed
/// channel means the client is gone.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Connection, room, and playback registry for the relay.
///
/// One implementation guards all three maps (connections, room membership,
/// playback state) as a single critical-section group: membership iteration
/// during a broadcast must not race with concurrent join/leave mutation, and
/// playback updates must be atomic with respect to reads by a joining
/// client.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RelayRegistry: Send + Sync {
    /// Register a new connection under a freshly generated ClientId.
    async fn register(&self, sender: PusherChannel) -> ClientId;

    /// Tear down a connection: drop its registry entry and, if it was bound
    /// to a room, remove it from that room's membership. An emptied room is
    /// deleted (its playback entry is left in place); a room with remaining
    /// members gets a fresh participants broadcast.
    async fn deregister(&self, client_id: &ClientId);

    /// Create a room if absent. Idempotent; never clears existing
    /// membership or playback state.
    async fn create_room(&self, room: &RoomName);

    /// Add the client to the room (creating it if absent), pruning stale
    /// members first, and bind the client's session to this room. Returns
    /// the room's playback state, if any, for the joiner to resynchronize.
    async fn join_room(&self, client_id: &ClientId, room: &RoomName) -> Option<PlaybackState>;

    /// Replace the room's playback state wholesale with a freshly loaded
    /// video (paused, position zero).
    async fn load_video(&self, room: &RoomName, video: VideoSource);

    /// Set the play/pause flag if the room has playback state.
    async fn set_playing(&self, room: &RoomName, playing: bool);

    /// Set the playback position if the room has playback state.
    async fn update_position(&self, room: &RoomName, position: f64);

    /// Push a payload to a single client.
    async fn push_to(&self, client_id: &ClientId, payload: &str) -> Result<(), PushError>;

    /// Send the payload to every current member of the room. Members whose
    /// channel is gone or whose send fails are purged from the registry and
    /// this room's membership; the broadcast continues to the rest. No-op if
    /// the room does not exist.
    async fn broadcast(&self, room: &RoomName, payload: &str);

    /// Broadcast the room's current participant list to the whole room.
    async fn broadcast_participants(&self, room: &RoomName);

    /// Snapshot of every room, for the read-only HTTP surface.
    async fn room_summaries(&self) -> Vec<RoomSnapshot>;

    /// Snapshot of one room, if it exists.
    async fn room_detail(&self, room: &RoomName) -> Option<RoomSnapshot>;
}
