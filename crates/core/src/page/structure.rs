//! Structure watcher
//!
//! The host page inserts rows either one at a time or as a whole batch under
//! a fresh rows container, depending on its rendering path. Both checks run
//! for every mutation record; they are not exclusive.

use std::sync::Arc;

use calex_domain::{MutationRecord, PageConfig};
use tracing::trace;

use super::ports::ElementQuery;
use super::visibility::VisibilityTracker;

/// Registers rows introduced by DOM mutations with the visibility tracker
pub struct StructureWatcher {
    query: Arc<dyn ElementQuery>,
    tracker: Arc<VisibilityTracker>,
    row_class: String,
    rows_container_selector: String,
}

impl StructureWatcher {
    pub fn new(
        query: Arc<dyn ElementQuery>,
        tracker: Arc<VisibilityTracker>,
        page: &PageConfig,
    ) -> Self {
        Self {
            query,
            tracker,
            row_class: page.row_class.clone(),
            rows_container_selector: page.rows_container_selector.clone(),
        }
    }

    /// Handle one mutation batch. Returns how many rows were newly registered.
    pub fn on_mutations(&self, records: &[MutationRecord]) -> usize {
        let mut registered = 0;

        for record in records {
            let target = record.target;

            // One row has changed
            if self.query.has_class(target, &self.row_class) && self.tracker.register(target) {
                registered += 1;
            }

            // All rows have been added at once
            if self.query.contains_selector(target, &self.rows_container_selector) {
                for row in self.query.descendants_with_class(target, &self.row_class) {
                    if self.tracker.register(row) {
                        registered += 1;
                    }
                }
            }
        }

        if registered > 0 {
            trace!(records = records.len(), registered, "mutation batch registered rows");
        }
        registered
    }
}
