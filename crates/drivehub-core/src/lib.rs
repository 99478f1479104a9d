//! # drivehub-core
//!
//! Core crate for DriveHub. Contains the drive client trait, configuration
//! schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DriveHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
