//! In-memory hierarchy store using the moka crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use drivehub_core::config::cache::MemoryCacheConfig;
use drivehub_core::result::AppResult;
use drivehub_entity::cache::{CacheEntry, CacheWrite};

use crate::keys::CacheKey;
use crate::store::HierarchyStore;

/// A stored entry. The counter lives beside the immutable snapshot so a
/// hit never rewrites the entry, and an upsert swaps the whole `Arc`.
#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    access_count: AtomicI64,
}

impl Slot {
    fn snapshot(&self) -> CacheEntry {
        CacheEntry {
            access_count: self.access_count.load(Ordering::SeqCst),
            ..self.entry.clone()
        }
    }
}

/// In-memory hierarchy store backed by moka.
///
/// Capacity-bounded; eviction is equivalent to a cache miss.
#[derive(Debug, Clone)]
pub struct MemoryHierarchyStore {
    cache: Cache<String, Arc<Slot>>,
}

impl MemoryHierarchyStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self {
            cache: Cache::builder().max_capacity(config.max_capacity).build(),
        }
    }
}

impl Default for MemoryHierarchyStore {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl HierarchyStore for MemoryHierarchyStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &CacheKey) -> AppResult<Option<CacheEntry>> {
        Ok(self.cache.get(&key.render()).await.map(|slot| slot.snapshot()))
    }

    async fn upsert(&self, key: &CacheKey, data: CacheWrite) -> AppResult<CacheEntry> {
        let rendered = key.render();
        let now = Utc::now();
        let (id, created_at) = match self.cache.get(&rendered).await {
            Some(previous) => (previous.entry.id, previous.entry.created_at),
            None => (Uuid::new_v4(), now),
        };

        let entry = CacheEntry {
            id,
            cache_key: rendered.clone(),
            route_type: data.route_type,
            route_subtype: data.route_subtype,
            root_folder_id: data.root_folder_id,
            max_depth: data.max_depth,
            hierarchy_data: data.hierarchy_data,
            item_count: data.item_count,
            build_time_ms: data.build_time_ms,
            access_count: 1,
            created_at,
            updated_at: now,
        };

        self.cache
            .insert(
                rendered,
                Arc::new(Slot {
                    entry: entry.clone(),
                    access_count: AtomicI64::new(1),
                }),
            )
            .await;
        Ok(entry)
    }

    async fn increment_access(&self, key: &CacheKey) -> AppResult<()> {
        if let Some(slot) = self.cache.get(&key.render()).await {
            slot.access_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn delete_for_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<u64> {
        let doomed: Vec<String> = self
            .cache
            .iter()
            .filter(|(_, slot)| {
                slot.entry.route_type.as_deref() == Some(route_type)
                    && slot.entry.route_subtype.as_deref() == route_subtype
            })
            .map(|(key, _)| key.to_string())
            .collect();

        let mut count = 0u64;
        for key in doomed {
            if self.cache.remove(&key).await.is_some() {
                count += 1;
            }
        }

        debug!(route_type, ?route_subtype, count, "Deleted route cache entries");
        Ok(count)
    }

    async fn list(&self) -> AppResult<Vec<CacheEntry>> {
        let mut entries: Vec<CacheEntry> =
            self.cache.iter().map(|(_, slot)| slot.snapshot()).collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }
}
