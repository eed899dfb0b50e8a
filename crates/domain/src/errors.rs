//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Calex
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CalexError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The root element the engine observes is absent from the host page.
    #[error("Container element not found: {0}")]
    ContainerNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Calex operations
pub type Result<T> = std::result::Result<T, CalexError>;
