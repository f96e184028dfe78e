//! WebSocket connection handler and message router.
//!
//! Each connection runs an independent receive loop. Every received text
//! frame is decoded into an [`InboundMessage`] and dispatched by type;
//! handlers mutate the registry and fan the resulting message out to the
//! current members of the named room. A frame that is not a JSON object, has
//! an unrecognized `type`, or names no room where one is required is
//! silently dropped — nothing is reported back to the sender.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ClientId, RelayRegistry, RoomName, VideoSource};
use crate::infrastructure::dto::websocket::{
    ChatMessage, ClearVideoMessage, ConnectedMessage, InboundMessage, LocalMetaMessage,
    MessageType, ReadyMessage, RoomCreatedMessage, RoomStateMessage, SeekMessage,
};

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    let client_id = state.registry.register(tx).await;

    ws.on_upgrade(move |socket| handle_socket(socket, state, client_id, rx))
}

/// Spawns a task that drains the rx channel into this client's WebSocket
/// sink. Messages from other connections arrive here via the registry.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: ClientId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    // Notify the client of its id before any of its messages is processed
    let connected_msg = ConnectedMessage {
        r#type: MessageType::Connected,
        client_id: client_id.as_str().to_string(),
    };
    let connected_json = serde_json::to_string(&connected_msg).unwrap();
    if let Err(e) = sender.send(Message::Text(connected_json.into())).await {
        tracing::error!(
            "Failed to send connected ack to '{}': {}",
            client_id.as_str(),
            e
        );
        state.registry.deregister(&client_id).await;
        return;
    }
    tracing::info!("Client '{}' connected", client_id.as_str());

    let registry = state.registry.clone();
    let recv_client_id = client_id.clone();

    // Receive loop: messages from this client, processed in receipt order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!(
                        "Received text from '{}': {}",
                        recv_client_id.as_str(),
                        text
                    );
                    route_message(&registry, &recv_client_id, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_client_id.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Send loop: messages from other clients, pushed to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.registry.deregister(&client_id).await;
    tracing::info!("Client '{}' disconnected", client_id.as_str());
}

/// Extract a usable room name; a missing or empty room drops the message.
fn room_name(room: Option<String>) -> Option<RoomName> {
    room.and_then(|r| RoomName::new(r).ok())
}

/// Dispatch one decoded inbound frame.
///
/// The sender is not verified to be a member of the room it names; any
/// connection that knows a room name may address it.
pub(crate) async fn route_message(
    registry: &Arc<dyn RelayRegistry>,
    client_id: &ClientId,
    text: &str,
) {
    let msg: InboundMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!("Dropping unroutable frame: {}", e);
            return;
        }
    };

    match msg {
        InboundMessage::CreateRoom { room } => {
            let Some(room) = room_name(room) else { return };
            registry.create_room(&room).await;

            let ack = RoomCreatedMessage {
                r#type: MessageType::RoomCreated,
                room: room.as_str().to_string(),
            };
            let ack_json = serde_json::to_string(&ack).unwrap();
            if let Err(e) = registry.push_to(client_id, &ack_json).await {
                tracing::warn!("Failed to ack createRoom to '{}': {}", client_id.as_str(), e);
            }
        }
        InboundMessage::Join { room } => {
            let Some(room) = room_name(room) else { return };
            let playback = registry.join_room(client_id, &room).await;

            registry.broadcast_participants(&room).await;

            // Only the joining client receives the current room state
            if let Some(playback) = playback {
                let state_msg = RoomStateMessage {
                    r#type: MessageType::RoomState,
                    state: playback.into(),
                };
                let state_json = serde_json::to_string(&state_msg).unwrap();
                if let Err(e) = registry.push_to(client_id, &state_json).await {
                    tracing::warn!(
                        "Failed to send room state to '{}': {}",
                        client_id.as_str(),
                        e
                    );
                }
            }
        }
        InboundMessage::Ready { room, ready } => {
            let Some(room) = room_name(room) else { return };
            let msg = ReadyMessage {
                r#type: MessageType::Ready,
                from: client_id.as_str().to_string(),
                ready,
            };
            registry
                .broadcast(&room, &serde_json::to_string(&msg).unwrap())
                .await;
        }
        InboundMessage::Video {
            room,
            mode,
            video_id,
        } => {
            let Some(room) = room_name(room) else { return };
            registry.load_video(&room, VideoSource { mode, video_id }).await;
            registry.broadcast(&room, text).await;
        }
        InboundMessage::Command { room, action } => {
            let Some(room) = room_name(room) else { return };
            registry
                .set_playing(&room, action.as_deref() == Some("play"))
                .await;
            registry.broadcast(&room, text).await;
        }
        InboundMessage::Seek { room, position } => {
            // Seek positions are broadcast but never persisted
            let Some(room) = room_name(room) else { return };
            let msg = SeekMessage {
                r#type: MessageType::Seek,
                position,
            };
            registry
                .broadcast(&room, &serde_json::to_string(&msg).unwrap())
                .await;
        }
        InboundMessage::Heartbeat { room, position } => {
            let Some(room) = room_name(room) else { return };
            registry.update_position(&room, position).await;
            registry.broadcast(&room, text).await;
        }
        InboundMessage::LocalMeta {
            room,
            duration,
            size,
        } => {
            let Some(room) = room_name(room) else { return };
            let msg = LocalMetaMessage {
                r#type: MessageType::LocalMeta,
                from: client_id.as_str().to_string(),
                duration,
                size,
            };
            registry
                .broadcast(&room, &serde_json::to_string(&msg).unwrap())
                .await;
        }
        InboundMessage::ClearVideo { room } => {
            // Playback state is deliberately left as-is
            let Some(room) = room_name(room) else { return };
            let msg = ClearVideoMessage {
                r#type: MessageType::ClearVideo,
            };
            registry
                .broadcast(&room, &serde_json::to_string(&msg).unwrap())
                .await;
        }
        InboundMessage::Chat {
            room,
            from_name,
            text: chat_text,
        } => {
            let Some(room) = room_name(room) else { return };
            let msg = ChatMessage {
                r#type: MessageType::Chat,
                from: client_id.as_str().to_string(),
                from_name,
                text: chat_text,
            };
            registry
                .broadcast(&room, &serde_json::to_string(&msg).unwrap())
                .await;
        }
    }
}
