//! Domain constants
//!
//! Defaults for the host-page selectors and the engine tuning knobs. The
//! engine values were tuned empirically against the host page's re-render
//! cadence and are overridable through [`crate::Config`].

// Host page selectors
pub const DEFAULT_CONTAINER_ID: &str = "calendar-events";
pub const DEFAULT_ROW_CLASS: &str = "event-row";
pub const DEFAULT_ROWS_CONTAINER_SELECTOR: &str = "[data-event-rows]";

// Engine tuning
pub const DEFAULT_REAPPLY_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_INTERSECTION_THRESHOLD: f64 = 0.0;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Diagnostic shown when the root container cannot be located at startup.
pub const CONTAINER_NOT_FOUND_MESSAGE: &str =
    "Couldn't find events container element, try to reload the tab.";
