//! Route mapping entities.

pub mod model;

pub use model::RouteConfig;
