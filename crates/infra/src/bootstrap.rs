//! Session bootstrap
//!
//! Wires the cache, engine, tracker and watcher for one page session and
//! routes host observer callbacks to them.

use std::sync::Arc;

use calex_core::{
    ElementQuery, EventCache, FetchTransport, HostDocument, RowInspector, StructureWatcher,
    SyncEngine, VisibilityTracker,
};
use calex_domain::constants::CONTAINER_NOT_FOUND_MESSAGE;
use calex_domain::{CalexError, Config, ElementId, IntersectionEntry, MutationRecord, Result};
use tracing::{error, info, instrument};

/// One running page session
pub struct Session {
    config: Config,
    root: ElementId,
    engine: Arc<SyncEngine>,
    tracker: Arc<VisibilityTracker>,
    watcher: StructureWatcher,
}

impl Session {
    /// Start observing the host page.
    ///
    /// Locates the root container, requests the calendar list, creates the
    /// viewport observer and arms mutation observation. Must be called inside
    /// a tokio runtime.
    ///
    /// # Errors
    /// - `CalexError::Config` if `config` fails validation
    /// - `CalexError::ContainerNotFound` if the root container is absent; no
    ///   observers are armed and nothing is fetched
    #[instrument(skip_all, fields(container_id = %config.page.container_id))]
    pub fn start<H>(
        config: Config,
        host: Arc<H>,
        transport: Arc<dyn FetchTransport>,
    ) -> Result<Self>
    where
        H: HostDocument + ElementQuery + RowInspector + 'static,
    {
        config.validate()?;

        let Some(root) = host.element_by_id(&config.page.container_id) else {
            error!("{CONTAINER_NOT_FOUND_MESSAGE}");
            return Err(CalexError::ContainerNotFound(CONTAINER_NOT_FOUND_MESSAGE.to_string()));
        };

        let cache = Arc::new(EventCache::new().with_debug_logging(config.engine.debug_store));
        let rows: Arc<dyn RowInspector> = host.clone();
        let engine =
            Arc::new(SyncEngine::new(cache, transport, Arc::clone(&rows), &config.engine)?);
        engine.request_calendar_list();

        let threshold = config.engine.intersection_threshold;
        let observer = host.viewport_observer(root, threshold);
        let tracker =
            Arc::new(VisibilityTracker::new(observer, rows, Arc::clone(&engine), threshold));

        let query: Arc<dyn ElementQuery> = host.clone();
        let watcher = StructureWatcher::new(query, Arc::clone(&tracker), &config.page);
        host.observe_mutations(root);

        info!(%root, threshold, reapply_ms = config.engine.reapply_interval_ms, "session started");
        Ok(Self { config, root, engine, tracker, watcher })
    }

    /// Host mutation-observer callback.
    pub fn on_mutations(&self, records: &[MutationRecord]) -> usize {
        self.watcher.on_mutations(records)
    }

    /// Host notification that rows were removed from the page.
    ///
    /// Returns how many of them were tracked.
    pub fn on_rows_removed(&self, rows: &[ElementId]) -> usize {
        rows.iter().filter(|row| self.tracker.unregister(**row)).count()
    }

    /// Host intersection-observer callback.
    pub fn on_intersections(&self, entries: &[IntersectionEntry]) {
        self.tracker.on_intersections(entries);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn cache(&self) -> &Arc<EventCache> {
        self.engine.cache()
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    pub fn tracker(&self) -> &Arc<VisibilityTracker> {
        &self.tracker
    }
}
