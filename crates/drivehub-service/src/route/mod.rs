//! Route mappings from portal routes to drive folders.

pub mod service;
pub mod store;

pub use service::{RouteDeletion, RouteService};
pub use store::{ConfiguredRoutes, RouteStore};
