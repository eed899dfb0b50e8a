//! # Calex Domain
//!
//! Domain types shared by every Calex crate.
//!
//! This crate contains:
//! - Calendar, event and row data types
//! - Host-page observation records (mutations, intersections)
//! - Configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Calex crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
