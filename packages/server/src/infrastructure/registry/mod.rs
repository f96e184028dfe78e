//! Registry implementations.
//!
//! This module provides the concrete implementation of the `RelayRegistry`
//! trait defined by the domain layer. The only implementation is in-memory;
//! nothing survives a process restart.

pub mod inmemory;

pub use inmemory::InMemoryRelayRegistry;
