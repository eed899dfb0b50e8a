//! Host page observation
//!
//! The [`StructureWatcher`] turns DOM mutation batches into row
//! registrations; the [`VisibilityTracker`] turns intersection batches into
//! enter/exit notifications for the synchronization engine.

pub mod ports;
pub mod structure;
pub mod visibility;

pub use structure::StructureWatcher;
pub use visibility::VisibilityTracker;
