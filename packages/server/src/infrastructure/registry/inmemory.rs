//! In-memory relay registry.
//!
//! Holds the three process-wide maps — connections, room membership, and
//! playback state — behind a single mutex. Membership iteration during a
//! broadcast, playback read-modify-write, and dead-member removal each run
//! as one critical section; a broadcast snapshots the membership under the
//! guard, sends outside it, and applies dead-member removal as a separate
//! guarded mutation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use watchroom_shared::time::get_unix_timestamp_millis;

use crate::domain::{
    ClientId, ClientIdFactory, Participant, PlaybackState, PushError, PusherChannel,
    RelayRegistry, RoomName, RoomSnapshot, Timestamp, VideoSource,
};
use crate::infrastructure::dto::websocket::{MessageType, ParticipantsMessage};

/// Per-connection session record.
///
/// `room` is the client's bound room, set only by a successful join and read
/// back at teardown.
struct ClientHandle {
    sender: PusherChannel,
    connected_at: Timestamp,
    room: Option<RoomName>,
}

#[derive(Default)]
struct RegistryInner {
    /// ClientId -> live channel and session record
    clients: HashMap<ClientId, ClientHandle>,
    /// Room name -> membership. A room is deleted the instant its
    /// membership becomes empty.
    rooms: HashMap<RoomName, HashSet<ClientId>>,
    /// Room name -> last known playback state. Entries are never deleted,
    /// so a state entry can outlive its room; a recreated room resumes
    /// from it.
    playback: HashMap<RoomName, PlaybackState>,
}

/// In-memory implementation of [`RelayRegistry`]
pub struct InMemoryRelayRegistry {
    inner: Mutex<RegistryInner>,
}

impl InMemoryRelayRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Remove members whose registry entry is missing or whose channel is
    /// closed. Pre-join hygiene; sends no notifications.
    fn prune_stale(inner: &mut RegistryInner, room: &RoomName) {
        let RegistryInner { clients, rooms, .. } = inner;
        let Some(members) = rooms.get_mut(room) else {
            return;
        };

        let stale: Vec<ClientId> = members
            .iter()
            .filter(|id| match clients.get(*id) {
                None => true,
                Some(handle) => handle.sender.is_closed(),
            })
            .cloned()
            .collect();

        for id in stale {
            tracing::debug!(
                "Removing stale client '{}' from room '{}'",
                id.as_str(),
                room.as_str()
            );
            members.remove(&id);
            clients.remove(&id);
        }
    }

    fn snapshot_room(inner: &RegistryInner, name: &RoomName) -> Option<RoomSnapshot> {
        let members = inner.rooms.get(name)?;

        let mut participants: Vec<Participant> = members
            .iter()
            .filter_map(|id| {
                inner.clients.get(id).map(|handle| Participant {
                    id: id.clone(),
                    connected_at: handle.connected_at,
                })
            })
            .collect();
        participants.sort_by(|a, b| a.id.cmp(&b.id));

        Some(RoomSnapshot {
            name: name.clone(),
            participants,
            playback: inner.playback.get(name).cloned(),
        })
    }
}

impl Default for InMemoryRelayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayRegistry for InMemoryRelayRegistry {
    async fn register(&self, sender: PusherChannel) -> ClientId {
        let client_id = ClientIdFactory::generate();
        let handle = ClientHandle {
            sender,
            connected_at: Timestamp::new(get_unix_timestamp_millis()),
            room: None,
        };

        let mut inner = self.inner.lock().await;
        inner.clients.insert(client_id.clone(), handle);
        tracing::info!("Client '{}' registered", client_id.as_str());

        client_id
    }

    async fn deregister(&self, client_id: &ClientId) {
        let notify = {
            let mut inner = self.inner.lock().await;
            let Some(handle) = inner.clients.remove(client_id) else {
                // Already purged, e.g. by a failed send during a broadcast
                return;
            };
            tracing::info!("Client '{}' removed from registry", client_id.as_str());

            match handle.room {
                Some(room) => {
                    let remaining = match inner.rooms.get_mut(&room) {
                        Some(members) => {
                            members.remove(client_id);
                            members.len()
                        }
                        None => return,
                    };
                    if remaining == 0 {
                        // Playback state intentionally survives the room
                        inner.rooms.remove(&room);
                        tracing::info!("Room '{}' is empty and was removed", room.as_str());
                        None
                    } else {
                        Some(room)
                    }
                }
                None => None,
            }
        };

        if let Some(room) = notify {
            self.broadcast_participants(&room).await;
        }
    }

    async fn create_room(&self, room: &RoomName) {
        let mut inner = self.inner.lock().await;
        if inner.rooms.contains_key(room) {
            return;
        }
        inner.rooms.insert(room.clone(), HashSet::new());
        tracing::info!("Room '{}' created", room.as_str());
    }

    async fn join_room(&self, client_id: &ClientId, room: &RoomName) -> Option<PlaybackState> {
        let mut inner = self.inner.lock().await;

        inner.rooms.entry(room.clone()).or_default();
        Self::prune_stale(&mut inner, room);

        if let Some(members) = inner.rooms.get_mut(room) {
            members.insert(client_id.clone());
        }
        if let Some(handle) = inner.clients.get_mut(client_id) {
            handle.room = Some(room.clone());
        }
        tracing::info!(
            "Client '{}' joined room '{}'",
            client_id.as_str(),
            room.as_str()
        );

        inner.playback.get(room).cloned()
    }

    async fn load_video(&self, room: &RoomName, video: VideoSource) {
        let mut inner = self.inner.lock().await;
        inner
            .playback
            .insert(room.clone(), PlaybackState::load(video));
    }

    async fn set_playing(&self, room: &RoomName, playing: bool) {
        let mut inner = self.inner.lock().await;
        if let Some(state) = inner.playback.get_mut(room) {
            state.set_playing(playing);
        }
    }

    async fn update_position(&self, room: &RoomName, position: f64) {
        let mut inner = self.inner.lock().await;
        if let Some(state) = inner.playback.get_mut(room) {
            state.set_position(position);
        }
    }

    async fn push_to(&self, client_id: &ClientId, payload: &str) -> Result<(), PushError> {
        let inner = self.inner.lock().await;

        let Some(handle) = inner.clients.get(client_id) else {
            return Err(PushError::ClientNotFound(client_id.as_str().to_string()));
        };
        handle
            .sender
            .send(payload.to_string())
            .map_err(|_| PushError::ChannelClosed(client_id.as_str().to_string()))
    }

    async fn broadcast(&self, room: &RoomName, payload: &str) {
        // Snapshot the membership and channels under the guard; never
        // iterate the live set while sending.
        let targets: Vec<(ClientId, Option<PusherChannel>)> = {
            let inner = self.inner.lock().await;
            let Some(members) = inner.rooms.get(room) else {
                return;
            };
            members
                .iter()
                .map(|id| (id.clone(), inner.clients.get(id).map(|h| h.sender.clone())))
                .collect()
        };

        let mut dead: Vec<ClientId> = Vec::new();
        for (id, sender) in targets {
            match sender {
                Some(sender) => {
                    if sender.send(payload.to_string()).is_err() {
                        tracing::warn!("Send failed to client '{}'", id.as_str());
                        dead.push(id);
                    }
                }
                None => dead.push(id),
            }
        }

        if dead.is_empty() {
            return;
        }

        // Dead-peer cleanup is bookkeeping for this room and the registry
        // only; the peer's own receive loop runs its teardown separately.
        let mut inner = self.inner.lock().await;
        for id in dead {
            inner.clients.remove(&id);
            if let Some(members) = inner.rooms.get_mut(room) {
                members.remove(&id);
            }
            tracing::warn!(
                "Purged dead client '{}' from room '{}'",
                id.as_str(),
                room.as_str()
            );
        }
    }

    async fn broadcast_participants(&self, room: &RoomName) {
        // Membership is resolved at send time, not from a cached list.
        let payload = {
            let inner = self.inner.lock().await;
            let Some(members) = inner.rooms.get(room) else {
                return;
            };
            let mut list: Vec<String> =
                members.iter().map(|id| id.as_str().to_string()).collect();
            list.sort();

            let msg = ParticipantsMessage {
                r#type: MessageType::Participants,
                list,
            };
            serde_json::to_string(&msg).unwrap()
        };

        self.broadcast(room, &payload).await;
    }

    async fn room_summaries(&self) -> Vec<RoomSnapshot> {
        let inner = self.inner.lock().await;
        let mut names: Vec<&RoomName> = inner.rooms.keys().collect();
        names.sort();
        names
            .into_iter()
            .filter_map(|name| Self::snapshot_room(&inner, name))
            .collect()
    }

    async fn room_detail(&self, room: &RoomName) -> Option<RoomSnapshot> {
        let inner = self.inner.lock().await;
        Self::snapshot_room(&inner, room)
    }
}
