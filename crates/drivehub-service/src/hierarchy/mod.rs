//! Hierarchy building and cache orchestration.

pub mod builder;
pub mod clock;
pub mod service;

pub use builder::{BuildOptions, BuildOutput, HierarchyBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use service::{HierarchyResponse, HierarchyService};
