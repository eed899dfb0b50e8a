//! Configuration structures
//!
//! Every section carries serde defaults, so a partial file (or none at all)
//! still yields a usable [`Config`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTAINER_ID, DEFAULT_INTERSECTION_THRESHOLD, DEFAULT_LOG_LEVEL,
    DEFAULT_REAPPLY_INTERVAL_MS, DEFAULT_ROWS_CONTAINER_SELECTOR, DEFAULT_ROW_CLASS,
};
use crate::errors::{CalexError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Check the values a loader cannot enforce through types alone.
    ///
    /// # Errors
    /// Returns `CalexError::Config` for empty selectors, a zero re-apply
    /// interval, or an intersection threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        self.page.validate()?;
        self.engine.validate()
    }
}

/// Where the engine looks in the host page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Element id of the root container that holds every calendar row.
    pub container_id: String,
    /// Class carried by each event row.
    pub row_class: String,
    /// Selector marking the element that wraps a freshly rendered batch of rows.
    pub rows_container_selector: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            row_class: DEFAULT_ROW_CLASS.to_string(),
            rows_container_selector: DEFAULT_ROWS_CONTAINER_SELECTOR.to_string(),
        }
    }
}

impl PageConfig {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("page.container_id", &self.container_id),
            ("page.row_class", &self.row_class),
            ("page.rows_container_selector", &self.rows_container_selector),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CalexError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Synchronization engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period of the per-row description re-apply timer.
    pub reapply_interval_ms: u64,
    /// Fraction of a row that must be visible for it to count as entering.
    pub intersection_threshold: f64,
    /// Log a cache snapshot after every store mutation.
    pub debug_store: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reapply_interval_ms: DEFAULT_REAPPLY_INTERVAL_MS,
            intersection_threshold: DEFAULT_INTERSECTION_THRESHOLD,
            debug_store: false,
        }
    }
}

impl EngineConfig {
    pub fn reapply_interval(&self) -> Duration {
        Duration::from_millis(self.reapply_interval_ms)
    }

    /// # Errors
    /// Returns `CalexError::Config` for a zero interval or a threshold
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.reapply_interval_ms == 0 {
            return Err(CalexError::Config("engine.reapply_interval_ms must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.intersection_threshold) {
            return Err(CalexError::Config(format!(
                "engine.intersection_threshold must be within [0, 1], got {}",
                self.intersection_threshold
            )));
        }
        Ok(())
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
