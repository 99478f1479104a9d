//! # drivehub-storage
//!
//! Drive client implementations for DriveHub: the Google Drive v3 REST
//! API, a local directory tree, and an in-memory fixture drive.

pub mod manager;
pub mod providers;

pub use manager::connect;
