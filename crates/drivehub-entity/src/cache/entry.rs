//! Hierarchy cache entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::hierarchy::HierarchyItem;

/// A cached hierarchy, one row per cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CacheEntry {
    /// Row identifier.
    pub id: Uuid,
    /// Rendered cache key.
    pub cache_key: String,
    /// Route type, when the entry was derived from a route.
    pub route_type: Option<String>,
    /// Route subtype, when the entry was derived from a route.
    pub route_subtype: Option<String>,
    /// Root folder the tree was built from.
    pub root_folder_id: String,
    /// Depth limit used for the build.
    pub max_depth: i32,
    /// Serialized root [`HierarchyItem`].
    pub hierarchy_data: serde_json::Value,
    /// Node count of the cached tree.
    pub item_count: i64,
    /// Build duration in milliseconds.
    pub build_time_ms: i64,
    /// Hits since the last rebuild (1 right after a rebuild).
    pub access_count: i64,
    /// When the key was first cached.
    pub created_at: DateTime<Utc>,
    /// When the entry was last rebuilt.
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Age of the entry relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.updated_at
    }

    /// Deserialize the cached tree.
    pub fn hierarchy(&self) -> Result<HierarchyItem, serde_json::Error> {
        serde_json::from_value(self.hierarchy_data.clone())
    }
}

/// Fields written by a cache upsert. Always a complete record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheWrite {
    /// Route type, when the entry is derived from a route.
    pub route_type: Option<String>,
    /// Route subtype, when the entry is derived from a route.
    pub route_subtype: Option<String>,
    /// Root folder the tree was built from.
    pub root_folder_id: String,
    /// Depth limit used for the build.
    pub max_depth: i32,
    /// Serialized root.
    pub hierarchy_data: serde_json::Value,
    /// Node count.
    pub item_count: i64,
    /// Build duration in milliseconds.
    pub build_time_ms: i64,
}
