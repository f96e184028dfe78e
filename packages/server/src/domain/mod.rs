//! Domain layer: value objects, entities, and the registry interface.

mod entity;
mod error;
mod registry;
mod value_object;

pub use entity::{Participant, PlaybackState, RoomSnapshot, VideoSource};
pub use error::{PushError, ValidationError};
pub use registry::{PusherChannel, RelayRegistry};
pub use value_object::{ClientId, ClientIdFactory, RoomName, Timestamp};

#[cfg(test)]
pub use registry::MockRelayRegistry;
