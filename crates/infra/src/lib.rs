//! # Calex Infrastructure
//!
//! Adapters around the core engine.
//!
//! This crate contains:
//! - Configuration loading (environment, TOML/JSON files, defaults)
//! - Tracing subscriber setup
//! - The runtime messaging transport and its serving loop
//! - Session bootstrap that wires everything to a host page
//!
//! ## Architecture
//! - Implements traits defined in `calex-core`
//! - Depends on `calex-domain` and `calex-core`

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod messaging;

// Re-export commonly used items
pub use bootstrap::Session;
pub use logging::init_tracing;
pub use messaging::{
    channel, serve_messages, CalendarApi, MessageTransport, RuntimeMessage, RuntimeReply,
    TransportError,
};
