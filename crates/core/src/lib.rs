//! # Calex Core
//!
//! Visibility-driven synchronization of event descriptions into a host
//! calendar page.
//!
//! This crate contains:
//! - The event cache (calendars, events, processed-set)
//! - Port interfaces (traits) for the host page and the fetch transport
//! - The visibility tracker, structure watcher and synchronization engine
//!
//! ## Architecture Principles
//! - Only depends on `calex-domain`
//! - No DOM, messaging or platform code
//! - All external collaborators via traits
//! - Handlers branch on missing data instead of returning errors

pub mod cache;
pub mod page;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use cache::{CacheAction, CacheSnapshot, EventCache};
pub use page::ports::{ElementQuery, HostDocument, RowInspector, ViewportObserver};
pub use page::{StructureWatcher, VisibilityTracker};
pub use sync::ports::FetchTransport;
pub use sync::{ReapplyTimer, SyncEngine};
