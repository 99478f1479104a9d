//! PostgreSQL-backed hierarchy store.

use async_trait::async_trait;
use sqlx::PgPool;

use drivehub_core::result::AppResult;
use drivehub_database::repositories::HierarchyCacheRepository;
use drivehub_entity::cache::{CacheEntry, CacheWrite};

use crate::keys::CacheKey;
use crate::store::HierarchyStore;

/// Hierarchy store persisting entries in the `hierarchy_cache` table.
#[derive(Debug, Clone)]
pub struct PostgresHierarchyStore {
    repo: HierarchyCacheRepository,
}

impl PostgresHierarchyStore {
    /// Create a store on an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: HierarchyCacheRepository::new(pool),
        }
    }
}

#[async_trait]
impl HierarchyStore for PostgresHierarchyStore {
    fn backend(&self) -> &str {
        "postgres"
    }

    async fn get(&self, key: &CacheKey) -> AppResult<Option<CacheEntry>> {
        self.repo.find_by_key(&key.render()).await
    }

    async fn upsert(&self, key: &CacheKey, data: CacheWrite) -> AppResult<CacheEntry> {
        self.repo.upsert(&key.render(), &data).await
    }

    async fn increment_access(&self, key: &CacheKey) -> AppResult<()> {
        self.repo.increment_access_count_by_key(&key.render()).await
    }

    async fn delete_for_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<u64> {
        self.repo.delete_for_route(route_type, route_subtype).await
    }

    async fn list(&self) -> AppResult<Vec<CacheEntry>> {
        self.repo.list().await
    }
}
