//! Domain error definitions.

use thiserror::Error;

/// Validation error for domain value objects
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("client id must not be empty")]
    EmptyClientId,
    #[error("room name must not be empty")]
    EmptyRoomName,
}

/// Error returned when a message cannot be pushed to a single client
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PushError {
    /// The client id has no entry in the connection registry
    #[error("client '{0}' not found in registry")]
    ClientNotFound(String),
    /// The client's channel is closed (its pusher task is gone)
    #[error("channel for client '{0}' is closed")]
    ChannelClosed(String),
}
