//! # drivehub-entity
//!
//! Domain entity models for DriveHub. Database entities derive
//! `sqlx::FromRow`; hierarchy items are plain serde value objects that are
//! stored as JSON inside cache entries.

pub mod cache;
pub mod hierarchy;
pub mod route;
