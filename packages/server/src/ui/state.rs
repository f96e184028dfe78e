//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::RelayRegistry;

/// Shared application state
pub struct AppState {
    /// Registry (connection, room, and playback bookkeeping)
    pub registry: Arc<dyn RelayRegistry>,
}
