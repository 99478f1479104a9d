//! Hierarchy store trait for pluggable cache backends.

use async_trait::async_trait;

use drivehub_core::result::AppResult;
use drivehub_entity::cache::{CacheEntry, CacheWrite};

use crate::keys::CacheKey;

/// Trait for hierarchy cache backends.
///
/// A store holds one [`CacheEntry`] per [`CacheKey`]. Entries carry their
/// own `updated_at`; the store never expires them, freshness is decided by
/// the caller.
#[async_trait]
pub trait HierarchyStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend name (e.g., "memory", "postgres").
    fn backend(&self) -> &str;

    /// Get the entry for a key.
    async fn get(&self, key: &CacheKey) -> AppResult<Option<CacheEntry>>;

    /// Insert or replace the entry for a key.
    ///
    /// The replacement is atomic: `access_count` becomes 1, `updated_at`
    /// becomes now, and no field of the previous entry survives except
    /// `id` and `created_at`.
    async fn upsert(&self, key: &CacheKey, data: CacheWrite) -> AppResult<CacheEntry>;

    /// Record a cache hit.
    async fn increment_access(&self, key: &CacheKey) -> AppResult<()>;

    /// Delete every entry derived from a route. Returns the number removed.
    async fn delete_for_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<u64>;

    /// List all entries.
    async fn list(&self) -> AppResult<Vec<CacheEntry>>;
}
