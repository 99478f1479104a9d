//! Statistics returned alongside a hierarchy.

use serde::{Deserialize, Serialize};

/// Aggregate statistics for a served hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyStats {
    /// Every node in the tree, including the root.
    pub total_items: u64,
    /// Deepest node depth.
    pub max_depth_reached: u32,
    /// Whether the tree came from the cache.
    pub from_cache: bool,
    /// Age of the cached entry in seconds (cache hits only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age_seconds: Option<i64>,
    /// Time spent building the tree in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_time_ms: Option<u64>,
    /// Folders whose listing failed during the build.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_folders: Vec<String>,
}

impl HierarchyStats {
    /// Whether the tree is known to be incomplete.
    pub fn is_partial(&self) -> bool {
        !self.failed_folders.is_empty()
    }
}
