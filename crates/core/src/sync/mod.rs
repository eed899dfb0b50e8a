//! Description synchronization
//!
//! The [`SyncEngine`] reacts to rows entering and leaving the viewport: it
//! serves descriptions from the cache, dispatches at most one fetch per event
//! id, and keeps a [`ReapplyTimer`] per visible row so descriptions survive
//! the host page re-rendering its rows.

pub mod engine;
pub mod ports;
pub mod reapply;

pub use engine::SyncEngine;
pub use reapply::ReapplyTimer;
