//! Value objects for the relay domain.
//!
//! `ClientId` and `RoomName` are the two keys used across the connection
//! registry, the room directory, and the room state store. Both are opaque
//! strings; the only invariant is that they are non-empty, mirroring how the
//! relay drops messages that name no room.

use uuid::Uuid;

use super::error::ValidationError;

/// Opaque identifier assigned to a connection at accept time.
///
/// Stable for the connection's lifetime; the sole key used across the
/// registry, the room directory, and participant lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
    /// Create a ClientId from an existing string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyClientId` if the string is empty.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyClientId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Factory for freshly generated client identifiers
pub struct ClientIdFactory;

impl ClientIdFactory {
    /// Generate a new unique ClientId (UUID v4)
    pub fn generate() -> ClientId {
        ClientId(Uuid::new_v4().to_string())
    }
}

/// Externally supplied room name (opaque, not namespaced).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    /// Create a RoomName from an externally supplied string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyRoomName` if the string is empty.
    /// An empty room field on an inbound message means the message is
    /// dropped, so the emptiness check lives here rather than in every
    /// handler.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyRoomName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
