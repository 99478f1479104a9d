//! # drivehub-database
//!
//! PostgreSQL connection management and repositories for hierarchy cache
//! entries and route mappings.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
