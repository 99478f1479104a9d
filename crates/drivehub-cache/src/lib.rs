//! # drivehub-cache
//!
//! Hierarchy cache stores for DriveHub. Supports two backends:
//!
//! - **memory**: In-process store using [moka](https://crates.io/crates/moka)
//! - **postgres**: The `hierarchy_cache` table via `drivehub-database`
//!
//! The backend is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod provider;
pub mod store;

pub use keys::CacheKey;
pub use provider::CacheManager;
pub use store::HierarchyStore;
