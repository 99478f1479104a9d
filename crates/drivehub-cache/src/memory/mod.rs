//! In-memory hierarchy store.

pub mod store;

pub use store::MemoryHierarchyStore;
