//! Messaging transport errors

use calex_domain::CalexError;
use thiserror::Error;

/// Failures of the runtime message channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The serving side has shut down.
    #[error("message channel closed")]
    ChannelClosed,

    /// The serving side dropped the request without replying.
    #[error("request dropped without a reply")]
    NoReply,

    /// The calendar API reported a failure.
    #[error("remote request failed: {0}")]
    Remote(String),

    /// The reply does not match the request kind.
    #[error("unexpected reply to {request}: {reply}")]
    UnexpectedReply { request: &'static str, reply: &'static str },
}

impl From<TransportError> for CalexError {
    fn from(value: TransportError) -> Self {
        CalexError::Transport(value.to_string())
    }
}
