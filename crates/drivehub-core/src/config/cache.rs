//! Hierarchy cache configuration.

use serde::{Deserialize, Serialize};

/// Top-level cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache store backend: `"memory"` or `"postgres"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Freshness window for hierarchies fetched by root folder id.
    #[serde(default = "default_hierarchy_ttl")]
    pub hierarchy_ttl_seconds: u64,
    /// Freshness window for route-mapped hierarchies.
    #[serde(default = "default_route_ttl")]
    pub route_ttl_seconds: u64,
    /// In-memory store configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            hierarchy_ttl_seconds: default_hierarchy_ttl(),
            route_ttl_seconds: default_route_ttl(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

/// In-memory cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of hierarchy entries kept in memory.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_hierarchy_ttl() -> u64 {
    2 * 60 * 60
}

fn default_route_ttl() -> u64 {
    4 * 60 * 60
}

fn default_max_capacity() -> u64 {
    1000
}
