//! Hierarchy cache entities.

pub mod entry;

pub use entry::{CacheEntry, CacheWrite};
