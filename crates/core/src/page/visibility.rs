//! Visibility tracker
//!
//! Wraps the shared viewport observer. Registration is idempotent, and the
//! tracker remembers which rows it last reported as visible so that the
//! engine sees exactly one enter and one exit per continuous visibility
//! interval, however often the host re-registers rows or re-delivers entries.

use std::collections::HashSet;
use std::sync::Arc;

use calex_domain::{ElementId, IntersectionEntry};
use parking_lot::Mutex;
use tracing::trace;

use super::ports::{RowInspector, ViewportObserver};
use crate::sync::SyncEngine;

#[derive(Debug, Default)]
struct TrackerState {
    registered: HashSet<ElementId>,
    visible: HashSet<ElementId>,
}

enum Transition {
    Enter { event_id: String, calendar_name: String },
    Exit,
    Unchanged,
}

/// Turns intersection batches into engine enter/exit notifications
pub struct VisibilityTracker {
    observer: Arc<dyn ViewportObserver>,
    rows: Arc<dyn RowInspector>,
    engine: Arc<SyncEngine>,
    threshold: f64,
    state: Mutex<TrackerState>,
}

impl VisibilityTracker {
    pub fn new(
        observer: Arc<dyn ViewportObserver>,
        rows: Arc<dyn RowInspector>,
        engine: Arc<SyncEngine>,
        threshold: f64,
    ) -> Self {
        Self { observer, rows, engine, threshold, state: Mutex::new(TrackerState::default()) }
    }

    /// Begin tracking a row. Returns `false` if it was already tracked.
    pub fn register(&self, row: ElementId) -> bool {
        let newly_registered = self.state.lock().registered.insert(row);
        if newly_registered {
            self.observer.observe(row);
            trace!(%row, "row registered");
        }
        newly_registered
    }

    /// Stop tracking a row the host has removed.
    ///
    /// A row that was visible gets its exit delivered here, since the
    /// observer will report nothing further for it. Returns `false` if the
    /// row was not tracked.
    pub fn unregister(&self, row: ElementId) -> bool {
        let (was_registered, was_visible) = {
            let mut state = self.state.lock();
            (state.registered.remove(&row), state.visible.remove(&row))
        };
        if was_registered {
            self.observer.unobserve(row);
            trace!(%row, "row unregistered");
        }
        if was_visible {
            self.engine.on_row_hidden(row);
        }
        was_registered
    }

    pub fn is_registered(&self, row: ElementId) -> bool {
        self.state.lock().registered.contains(&row)
    }

    pub fn is_visible(&self, row: ElementId) -> bool {
        self.state.lock().visible.contains(&row)
    }

    pub fn registered_count(&self) -> usize {
        self.state.lock().registered.len()
    }

    /// Handle one observation batch from the viewport observer.
    pub fn on_intersections(&self, entries: &[IntersectionEntry]) {
        for entry in entries {
            let row = entry.target;
            match self.transition(entry) {
                Transition::Enter { event_id, calendar_name } => {
                    self.engine.on_row_visible(row, &event_id, &calendar_name);
                }
                Transition::Exit => self.engine.on_row_hidden(row),
                Transition::Unchanged => {}
            }
        }
    }

    fn transition(&self, entry: &IntersectionEntry) -> Transition {
        let row = entry.target;
        let identifiers = self.rows.identifiers(row);
        let entering = entry.is_intersecting && entry.intersection_ratio >= self.threshold;

        let mut state = self.state.lock();
        match identifiers.complete() {
            Some((event_id, calendar_name)) if entering => {
                if state.visible.insert(row) {
                    Transition::Enter {
                        event_id: event_id.to_string(),
                        calendar_name: calendar_name.to_string(),
                    }
                } else {
                    Transition::Unchanged
                }
            }
            _ => {
                if state.visible.remove(&row) {
                    Transition::Exit
                } else {
                    Transition::Unchanged
                }
            }
        }
    }
}
