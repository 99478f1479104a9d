//! Core traits defined in `drivehub-core` and implemented by other crates.

pub mod drive;

pub use drive::{DriveClient, RawNode};
