//! Session-scoped cache of calendars and events
//!
//! The cache is owned explicitly and shared by reference with the engine and
//! its spawned tasks. It is rebuilt from scratch every session; nothing is
//! persisted.
//!
//! Mutations go through [`EventCache::dispatch`] with a [`CacheAction`], reads
//! through the accessor methods. The processed-set write is a single
//! test-and-set under the write lock, which is what keeps the "one fetch per
//! event id" guarantee intact when enter/exit/completion events interleave.

use std::collections::{HashMap, HashSet};

use calex_domain::{Calendar, Event};
use parking_lot::RwLock;
use tracing::debug;

/// Mutations accepted by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheAction {
    /// Record that a fetch for this event has been requested.
    FetchEvent { event_id: String },
    /// Store a fetched event. Ignored if the id is already cached.
    AddEvent { id: String, description: Option<String> },
    /// Merge a calendar list, replacing entries with the same id.
    AddCalendarList(Vec<Calendar>),
}

/// Point-in-time counts, used for debug logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub calendars: usize,
    pub events: usize,
    pub processed: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    calendars: HashMap<String, Calendar>,
    calendar_ids_by_name: HashMap<String, String>,
    events: HashMap<String, Event>,
    processed: HashSet<String>,
}

impl CacheState {
    fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            calendars: self.calendars.len(),
            events: self.events.len(),
            processed: self.processed.len(),
        }
    }

    fn merge_calendar(&mut self, calendar: Calendar) {
        if let Some(previous) = self.calendars.get(&calendar.id) {
            if previous.name != calendar.name
                && self.calendar_ids_by_name.get(&previous.name) == Some(&calendar.id)
            {
                self.calendar_ids_by_name.remove(&previous.name);
            }
        }
        self.calendar_ids_by_name.insert(calendar.name.clone(), calendar.id.clone());
        self.calendars.insert(calendar.id.clone(), calendar);
    }
}

/// In-memory store of calendars, events and the processed-set.
#[derive(Debug, Default)]
pub struct EventCache {
    state: RwLock<CacheState>,
    debug_store: bool,
}

impl EventCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a [`CacheSnapshot`] after every dispatched action.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_store = enabled;
        self
    }

    /// Apply a mutation.
    pub fn dispatch(&self, action: CacheAction) {
        let mut state = self.state.write();
        match action {
            CacheAction::FetchEvent { event_id } => {
                state.processed.insert(event_id);
            }
            CacheAction::AddEvent { id, description } => {
                if !state.events.contains_key(&id) {
                    state.events.insert(id.clone(), Event::new(id, description));
                }
            }
            CacheAction::AddCalendarList(calendars) => {
                for calendar in calendars {
                    state.merge_calendar(calendar);
                }
            }
        }

        if self.debug_store {
            let snapshot = state.snapshot();
            debug!(
                calendars = snapshot.calendars,
                events = snapshot.events,
                processed = snapshot.processed,
                "cache updated"
            );
        }
    }

    /// Mark an event as processed, returning `true` only for the first caller.
    ///
    /// This is the `FetchEvent` action with the check folded into the same
    /// critical section.
    pub fn mark_event_processed(&self, event_id: &str) -> bool {
        let newly_marked = {
            let mut state = self.state.write();
            state.processed.insert(event_id.to_string())
        };
        if newly_marked && self.debug_store {
            debug!(snapshot = ?self.snapshot(), event_id, "event marked processed");
        }
        newly_marked
    }

    pub fn event(&self, event_id: &str) -> Option<Event> {
        self.state.read().events.get(event_id).cloned()
    }

    /// The cached, non-empty description of an event.
    pub fn event_description(&self, event_id: &str) -> Option<String> {
        self.state.read().events.get(event_id).and_then(Event::description).map(str::to_owned)
    }

    pub fn calendar_by_name(&self, name: &str) -> Option<Calendar> {
        let state = self.state.read();
        state.calendar_ids_by_name.get(name).and_then(|id| state.calendars.get(id)).cloned()
    }

    pub fn is_event_processed(&self, event_id: &str) -> bool {
        self.state.read().processed.contains(event_id)
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        self.state.read().snapshot()
    }
}
