//! Domain types and models
//!
//! Calendar data fetched from the remote source, plus the handful of records
//! the host page hands us when its DOM changes.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Host Page Handles
// ============================================================================

/// Opaque handle to an element owned by the host page.
///
/// The host adapter issues one handle per element and keeps the mapping to the
/// real node. Calex never creates or destroys elements; it only observes and
/// annotates them through these handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Identifiers scraped from a row's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIdentifiers {
    pub event_id: Option<String>,
    pub calendar_name: Option<String>,
}

impl RowIdentifiers {
    pub fn new(event_id: impl Into<String>, calendar_name: impl Into<String>) -> Self {
        Self { event_id: Some(event_id.into()), calendar_name: Some(calendar_name.into()) }
    }

    /// Returns `(event_id, calendar_name)` when both are present and non-empty.
    ///
    /// Rows that fail this check are not real event rows and are never tracked
    /// for fetch or timer purposes.
    pub fn complete(&self) -> Option<(&str, &str)> {
        let event_id = self.event_id.as_deref().filter(|id| !id.is_empty())?;
        let calendar_name = self.calendar_name.as_deref().filter(|name| !name.is_empty())?;
        Some((event_id, calendar_name))
    }
}

/// A DOM mutation record: the element whose subtree changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub target: ElementId,
}

impl MutationRecord {
    pub const fn new(target: ElementId) -> Self {
        Self { target }
    }
}

/// One entry of a viewport-intersection observation batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub intersection_ratio: f64,
}

impl IntersectionEntry {
    pub const fn entering(target: ElementId, intersection_ratio: f64) -> Self {
        Self { target, is_intersecting: true, intersection_ratio }
    }

    pub const fn leaving(target: ElementId) -> Self {
        Self { target, is_intersecting: false, intersection_ratio: 0.0 }
    }
}

// ============================================================================
// Calendar Data
// ============================================================================

/// A calendar as listed by the remote source.
///
/// Rows only carry the human-readable `name`; the stable `id` is needed to
/// fetch events, so names are resolved through the cached calendar list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub name: String,
}

impl Calendar {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A cached event. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Event {
    pub fn new(id: impl Into<String>, description: Option<String>) -> Self {
        Self { id: id.into(), description }
    }

    /// The description, treating an empty string as absent.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }
}

/// Event payload as delivered by the fetch transport.
///
/// Both fields are optional on the wire; an event without an id cannot be
/// cached or addressed and is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl FetchedEvent {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id: Some(id.into()), description: Some(description.into()) }
    }
}
