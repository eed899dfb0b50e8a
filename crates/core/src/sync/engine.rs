//! Synchronization engine - visibility-driven description sync
//!
//! Each row moves through `Hidden -> Visible(timer armed) -> Hidden`. On
//! entering, the engine inserts any cached description, dispatches a fetch if
//! the event is unknown and not yet requested, and arms the row's re-apply
//! timer. On leaving, the timer is cancelled. In-flight fetches are never
//! cancelled; their results land in the cache and in the captured row.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use calex_domain::{Calendar, CalexError, ElementId, EngineConfig, FetchedEvent, Result};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

use super::ports::FetchTransport;
use super::reapply::ReapplyTimer;
use crate::cache::{CacheAction, EventCache};
use crate::page::ports::RowInspector;

/// Coordinates the cache, the fetch transport and per-row re-apply timers
pub struct SyncEngine {
    cache: Arc<EventCache>,
    transport: Arc<dyn FetchTransport>,
    rows: Arc<dyn RowInspector>,
    reapply_interval: Duration,
    runtime: Handle,
    timers: Mutex<HashMap<ElementId, ReapplyTimer>>,
}

impl SyncEngine {
    /// Create an engine bound to the current tokio runtime.
    ///
    /// # Errors
    /// - `CalexError::Config` if `config` fails validation
    /// - `CalexError::Internal` when called outside a tokio runtime; fetches
    ///   and timers are spawned onto it
    pub fn new(
        cache: Arc<EventCache>,
        transport: Arc<dyn FetchTransport>,
        rows: Arc<dyn RowInspector>,
        config: &EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|err| {
            CalexError::Internal(format!("sync engine requires a tokio runtime: {err}"))
        })?;

        Ok(Self {
            cache,
            transport,
            rows,
            reapply_interval: config.reapply_interval(),
            runtime,
            timers: Mutex::new(HashMap::new()),
        })
    }

    pub fn cache(&self) -> &Arc<EventCache> {
        &self.cache
    }

    /// A row carrying both identifiers entered the viewport.
    pub fn on_row_visible(&self, row: ElementId, event_id: &str, calendar_name: &str) {
        let event = self.cache.event(event_id);

        if let Some(description) = event.as_ref().and_then(|event| event.description()) {
            self.rows.insert_description(row, description);
        }

        let calendar_id = self
            .cache
            .calendar_by_name(calendar_name)
            .map(|calendar| calendar.id)
            .filter(|id| !id.is_empty());

        if event.is_none() {
            match calendar_id {
                Some(calendar_id) => {
                    if self.cache.mark_event_processed(event_id) {
                        self.spawn_event_fetch(row, calendar_id, event_id.to_string());
                    } else {
                        trace!(%row, event_id, "fetch already requested");
                    }
                }
                None => trace!(%row, event_id, calendar_name, "calendar not resolved; not fetching"),
            }
        }

        self.arm_reapply(row, event_id);
    }

    /// A row left the viewport (or lost its identifiers).
    pub fn on_row_hidden(&self, row: ElementId) {
        let Some(timer) = self.timers.lock().remove(&row) else {
            return;
        };
        timer.cancel();
        debug!(%row, "re-apply timer cancelled");
    }

    /// Merge a fetched calendar list into the cache.
    pub fn process_fetched_calendar_list(&self, calendars: Vec<Calendar>) {
        apply_calendar_list(&self.cache, calendars);
    }

    /// Store a fetched event and insert its description into `row`.
    pub fn process_fetched_event(&self, event: FetchedEvent, row: ElementId) {
        apply_fetched_event(&self.cache, self.rows.as_ref(), event, row);
    }

    /// Fetch the calendar list in the background and merge it on arrival.
    pub fn request_calendar_list(&self) {
        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);

        self.runtime.spawn(async move {
            match transport.fetch_calendar_list().await {
                Ok(calendars) => apply_calendar_list(&cache, calendars),
                Err(err) => warn!(error = %err, "calendar list fetch failed"),
            }
        });
    }

    pub fn has_active_timer(&self, row: ElementId) -> bool {
        self.timers.lock().contains_key(&row)
    }

    pub fn active_timer_count(&self) -> usize {
        self.timers.lock().len()
    }

    fn spawn_event_fetch(&self, row: ElementId, calendar_id: String, event_id: String) {
        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        let rows = Arc::clone(&self.rows);

        debug!(%row, %calendar_id, %event_id, "dispatching event fetch");
        self.runtime.spawn(async move {
            match transport.fetch_event(&calendar_id, &event_id).await {
                Ok(event) => apply_fetched_event(&cache, rows.as_ref(), event, row),
                Err(err) => {
                    warn!(%calendar_id, %event_id, error = %err, "event fetch failed");
                }
            }
        });
    }

    fn arm_reapply(&self, row: ElementId, event_id: &str) {
        let mut timers = self.timers.lock();
        let Entry::Vacant(slot) = timers.entry(row) else {
            return;
        };

        let cache = Arc::clone(&self.cache);
        let rows = Arc::clone(&self.rows);
        let event_id = event_id.to_string();
        slot.insert(ReapplyTimer::spawn(&self.runtime, self.reapply_interval, move || {
            if let Some(description) = cache.event_description(&event_id) {
                rows.insert_description(row, &description);
            }
        }));
        debug!(%row, "re-apply timer armed");
    }
}

fn apply_calendar_list(cache: &EventCache, calendars: Vec<Calendar>) {
    debug!(count = calendars.len(), "calendar list received");
    cache.dispatch(CacheAction::AddCalendarList(calendars));
}

fn apply_fetched_event(
    cache: &EventCache,
    rows: &dyn RowInspector,
    event: FetchedEvent,
    row: ElementId,
) {
    let FetchedEvent { id, description } = event;
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        trace!(%row, "dropping fetched event without id");
        return;
    };

    let description = description.filter(|text| !text.is_empty());
    cache.dispatch(CacheAction::AddEvent { id, description: description.clone() });

    if let Some(description) = description {
        rows.insert_description(row, &description);
    }
}
