//! Runtime messaging transport
//!
//! The page side never talks to the calendar API directly. It sends a
//! [`RuntimeMessage`] over a channel to the background side, which answers
//! through a [`CalendarApi`] and replies on a oneshot.
//!
//! ```text
//! SyncEngine ──► MessageTransport ──mpsc──► serve_messages ──► CalendarApi
//!                      ▲                          │
//!                      └──────── oneshot ─────────┘
//! ```

pub mod error;

use std::sync::Arc;

use async_trait::async_trait;
use calex_core::FetchTransport;
use calex_domain::{Calendar, FetchedEvent, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

pub use error::TransportError;

/// Default request queue depth.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Requests understood by the background side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuntimeMessage {
    FetchEvent {
        #[serde(rename = "calendarId")]
        calendar_id: String,
        #[serde(rename = "eventId")]
        event_id: String,
    },
    FetchCalendarList,
}

impl RuntimeMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FetchEvent { .. } => "fetchEvent",
            Self::FetchCalendarList => "fetchCalendarList",
        }
    }
}

/// Replies sent back to the page side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum RuntimeReply {
    Event(FetchedEvent),
    CalendarList(Vec<Calendar>),
    Failed(String),
}

impl RuntimeReply {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Event(_) => "event",
            Self::CalendarList(_) => "calendarList",
            Self::Failed(_) => "failed",
        }
    }
}

/// The remote calendar client used by the background side
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<FetchedEvent>;

    async fn list_calendars(&self) -> Result<Vec<Calendar>>;
}

/// A request in flight, paired with its reply slot.
#[derive(Debug)]
pub struct MessageRequest {
    pub message: RuntimeMessage,
    reply: oneshot::Sender<RuntimeReply>,
}

impl MessageRequest {
    /// Answer the request. A requester that has gone away is ignored.
    pub fn respond(self, reply: RuntimeReply) {
        if self.reply.send(reply).is_err() {
            trace!("requester dropped before reply");
        }
    }
}

/// Receiving half of the message channel.
pub type MessageReceiver = mpsc::Receiver<MessageRequest>;

/// Create a connected transport and receiver.
pub fn channel(capacity: usize) -> (MessageTransport, MessageReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (MessageTransport { sender }, receiver)
}

/// `FetchTransport` that forwards requests over the runtime message channel.
#[derive(Debug, Clone)]
pub struct MessageTransport {
    sender: mpsc::Sender<MessageRequest>,
}

impl MessageTransport {
    /// Send a message and wait for its reply.
    ///
    /// # Errors
    /// Returns `TransportError::ChannelClosed` if the serving side is gone and
    /// `TransportError::NoReply` if it dropped the request.
    pub async fn request(
        &self,
        message: RuntimeMessage,
    ) -> std::result::Result<RuntimeReply, TransportError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(MessageRequest { message, reply })
            .await
            .map_err(|_| TransportError::ChannelClosed)?;
        response.await.map_err(|_| TransportError::NoReply)
    }
}

#[async_trait]
impl FetchTransport for MessageTransport {
    async fn fetch_event(&self, calendar_id: &str, event_id: &str) -> Result<FetchedEvent> {
        let message = RuntimeMessage::FetchEvent {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        };
        let request = message.kind();
        match self.request(message).await? {
            RuntimeReply::Event(event) => Ok(event),
            RuntimeReply::Failed(reason) => Err(TransportError::Remote(reason).into()),
            other => Err(TransportError::UnexpectedReply { request, reply: other.kind() }.into()),
        }
    }

    async fn fetch_calendar_list(&self) -> Result<Vec<Calendar>> {
        let message = RuntimeMessage::FetchCalendarList;
        let request = message.kind();
        match self.request(message).await? {
            RuntimeReply::CalendarList(calendars) => Ok(calendars),
            RuntimeReply::Failed(reason) => Err(TransportError::Remote(reason).into()),
            other => Err(TransportError::UnexpectedReply { request, reply: other.kind() }.into()),
        }
    }
}

/// Answer requests until every transport handle has been dropped.
///
/// Each request is handled on its own task so that a slow API call does not
/// hold up the rest of the queue.
pub async fn serve_messages(mut receiver: MessageReceiver, api: Arc<dyn CalendarApi>) {
    debug!("message server started");

    while let Some(request) = receiver.recv().await {
        let api = Arc::clone(&api);
        tokio::spawn(async move {
            let reply = answer(api.as_ref(), &request.message).await;
            request.respond(reply);
        });
    }

    debug!("message server stopped");
}

async fn answer(api: &dyn CalendarApi, message: &RuntimeMessage) -> RuntimeReply {
    let outcome = match message {
        RuntimeMessage::FetchEvent { calendar_id, event_id } => {
            api.get_event(calendar_id, event_id).await.map(RuntimeReply::Event)
        }
        RuntimeMessage::FetchCalendarList => {
            api.list_calendars().await.map(RuntimeReply::CalendarList)
        }
    };

    outcome.unwrap_or_else(|err| {
        warn!(request = message.kind(), error = %err, "calendar api request failed");
        RuntimeReply::Failed(err.to_string())
    })
}
