//! Port interfaces for the host page
//!
//! These traits define the boundary between the engine and whatever owns the
//! real DOM. Every call is synchronous and side-effect only; elements that no
//! longer exist should read as empty rather than fail.

use std::sync::Arc;

use calex_domain::{ElementId, RowIdentifiers};

/// Reads identifiers from rows and writes descriptions into them
pub trait RowInspector: Send + Sync {
    /// Extract `(eventId, calendarName)` from a row's attributes
    fn identifiers(&self, row: ElementId) -> RowIdentifiers;

    /// Insert a description into a row, replacing any previous insertion
    fn insert_description(&self, row: ElementId, description: &str);
}

/// Structural queries used when a mutation batch arrives
pub trait ElementQuery: Send + Sync {
    /// Whether the element itself carries `class`
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Whether any element in the subtree rooted at `element` matches `selector`
    fn contains_selector(&self, element: ElementId, selector: &str) -> bool;

    /// All descendants of `element` carrying `class`, in document order
    fn descendants_with_class(&self, element: ElementId, class: &str) -> Vec<ElementId>;
}

/// A viewport-intersection observer scoped to one root element
pub trait ViewportObserver: Send + Sync {
    /// Start reporting intersection changes for `element`
    fn observe(&self, element: ElementId);

    /// Stop reporting for `element`
    fn unobserve(&self, element: ElementId);
}

/// Document-level entry points used at startup
pub trait HostDocument: Send + Sync {
    /// Look up an element by its id attribute
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// Start delivering child-list mutations for the subtree under `root`
    fn observe_mutations(&self, root: ElementId);

    /// Create the intersection observer for rows under `root`
    fn viewport_observer(&self, root: ElementId, threshold: f64) -> Arc<dyn ViewportObserver>;
}
