//! # drivehub-service
//!
//! Business logic for DriveHub: naming-convention parsing, description
//! metadata extraction, hierarchy building, cache orchestration, search,
//! and route administration.
//!
//! Services follow constructor injection: the drive client, cache store
//! and route store are handed in as `Arc<dyn Trait>` at construction time.

pub mod hierarchy;
pub mod metadata;
pub mod naming;
pub mod route;
pub mod search;

pub use hierarchy::{BuildOptions, BuildOutput, HierarchyBuilder, HierarchyResponse, HierarchyService};
pub use route::{ConfiguredRoutes, RouteService, RouteStore};
pub use search::{SearchExecutor, SearchOptions, SearchResponse, SearchResult};
