//! Shared utilities for the watchroom workspace.
//!
//! Cross-cutting concerns used by the server binary and its tests:
//! logging setup and timestamp handling.

pub mod logger;
pub mod time;
