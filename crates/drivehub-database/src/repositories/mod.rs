//! Repository implementations for DriveHub entities.

pub mod hierarchy_cache;
pub mod route_config;

pub use hierarchy_cache::HierarchyCacheRepository;
pub use route_config::{NewRouteConfig, RouteConfigRepository};
