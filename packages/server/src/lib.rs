//! Watch-together synchronization relay.
//!
//! Independent clients join a named room over a WebSocket connection and the
//! relay multiplexes playback control, chat, and metadata messages among all
//! members of that room, remembering the last known playback state so late
//! joiners can resynchronize.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
