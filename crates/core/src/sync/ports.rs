//! Port interface for the fetch transport
//!
//! The transport owns delivery, retry and the wire protocol. The engine only
//! spawns a request and waits for its result in a detached task.

use async_trait::async_trait;
use calex_domain::{Calendar, FetchedEvent, Result};

/// Asynchronous request/response channel to the remote calendar source
#[async_trait]
pub trait FetchTransport: Send + Sync {
    /// Fetch a single event of a calendar
    async fn fetch_event(&self, calendar_id: &str, event_id: &str) -> Result<FetchedEvent>;

    /// Fetch every calendar visible to the user
    async fn fetch_calendar_list(&self) -> Result<Vec<Calendar>>;
}
