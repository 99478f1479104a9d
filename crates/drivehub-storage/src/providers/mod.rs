//! Drive client implementations.

#[cfg(feature = "google")]
pub mod google;
#[cfg(feature = "local")]
pub mod local;
pub mod memory;
