//! Hierarchy builder configuration.

use serde::{Deserialize, Serialize};

/// Defaults applied to hierarchy builds when the caller does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Depth used when a request does not specify one.
    #[serde(default = "default_max_depth")]
    pub default_max_depth: u32,
    /// Upper bound on concurrent `list_children` calls within one build.
    #[serde(default = "default_max_concurrent_listings")]
    pub max_concurrent_listings: usize,
    /// A build running longer than this is abandoned and nothing is cached.
    #[serde(default = "default_build_timeout")]
    pub build_timeout_seconds: u64,
    /// Keep nodes whose names start with a dot.
    #[serde(default)]
    pub include_hidden: bool,
    /// Parse file descriptions into property bags.
    #[serde(default = "default_true")]
    pub process_metadata: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            default_max_depth: default_max_depth(),
            max_concurrent_listings: default_max_concurrent_listings(),
            build_timeout_seconds: default_build_timeout(),
            include_hidden: false,
            process_metadata: true,
        }
    }
}

fn default_max_depth() -> u32 {
    5
}

fn default_max_concurrent_listings() -> usize {
    8
}

fn default_build_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}
