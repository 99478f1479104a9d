//! Cache manager that dispatches to the configured hierarchy store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use drivehub_core::config::cache::CacheConfig;
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_entity::cache::{CacheEntry, CacheWrite};

use crate::keys::CacheKey;
use crate::store::HierarchyStore;

/// Cache manager that wraps the configured hierarchy store.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn HierarchyStore>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    ///
    /// The `postgres` backend needs a pool; `memory` ignores it.
    #[cfg_attr(not(feature = "postgres"), allow(unused_variables))]
    pub fn new(config: &CacheConfig, pool: Option<&sqlx_pool::Pool>) -> AppResult<Self> {
        let inner: Arc<dyn HierarchyStore> = match config.provider.as_str() {
            #[cfg(feature = "postgres")]
            "postgres" => {
                info!("Initializing PostgreSQL hierarchy store");
                let pool = pool.ok_or_else(|| {
                    AppError::configuration(
                        "Cache provider 'postgres' requires a [database] section",
                    )
                })?;
                Arc::new(crate::postgres::PostgresHierarchyStore::new(pool.clone()))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory hierarchy store");
                Arc::new(crate::memory::MemoryHierarchyStore::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn HierarchyStore>) -> Self {
        Self { inner: store }
    }
}

#[cfg(feature = "postgres")]
mod sqlx_pool {
    pub type Pool = sqlx::PgPool;
}

#[cfg(not(feature = "postgres"))]
mod sqlx_pool {
    /// Placeholder so the constructor signature is stable without sqlx.
    pub type Pool = ();
}

#[async_trait]
impl HierarchyStore for CacheManager {
    fn backend(&self) -> &str {
        self.inner.backend()
    }

    async fn get(&self, key: &CacheKey) -> AppResult<Option<CacheEntry>> {
        self.inner.get(key).await
    }

    async fn upsert(&self, key: &CacheKey, data: CacheWrite) -> AppResult<CacheEntry> {
        self.inner.upsert(key, data).await
    }

    async fn increment_access(&self, key: &CacheKey) -> AppResult<()> {
        self.inner.increment_access(key).await
    }

    async fn delete_for_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<u64> {
        self.inner.delete_for_route(route_type, route_subtype).await
    }

    async fn list(&self) -> AppResult<Vec<CacheEntry>> {
        self.inner.list().await
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_selected() {
        let manager = CacheManager::new(&CacheConfig::default(), None).unwrap();
        assert_eq!(manager.backend(), "memory");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let config = CacheConfig {
            provider: "redis".to_string(),
            ..CacheConfig::default()
        };
        let err = CacheManager::new(&config, None).unwrap_err();
        assert_eq!(err.kind, drivehub_core::error::ErrorKind::Configuration);
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_postgres_requires_pool() {
        let config = CacheConfig {
            provider: "postgres".to_string(),
            ..CacheConfig::default()
        };
        assert!(CacheManager::new(&config, None).is_err());
    }
}
