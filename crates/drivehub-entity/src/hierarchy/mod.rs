//! Hierarchy tree entities.

pub mod item;
pub mod properties;
pub mod role;
pub mod stats;

pub use item::{FileItem, FolderItem, HierarchyItem, PathSegment};
pub use properties::{ContentCode, FileProperties};
pub use role::Role;
pub use stats::HierarchyStats;
