//! Wiring from configuration to services.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use drivehub_cache::{CacheManager, HierarchyStore};
use drivehub_core::config::AppConfig;
use drivehub_core::error::AppError;
use drivehub_database::DatabasePool;
use drivehub_database::repositories::RouteConfigRepository;
use drivehub_service::{
    ConfiguredRoutes, HierarchyBuilder, HierarchyService, RouteService, RouteStore,
};

/// Everything a command needs, built once per invocation.
pub struct Context {
    /// Database pool, when `[database]` is configured.
    pub pool: Option<PgPool>,
    /// Hierarchy cache store.
    pub cache: Arc<dyn HierarchyStore>,
    /// Hierarchy service over the configured drive.
    pub service: HierarchyService,
}

impl Context {
    /// Connect the database (if configured), cache, routes and drive.
    ///
    /// Routes come from the `route_configs` table when a database is
    /// configured, otherwise from `[[routes]]` in the configuration file.
    pub async fn build(config: &AppConfig) -> Result<Self, AppError> {
        let pool = match &config.database {
            Some(db) => Some(DatabasePool::connect(db).await?.into_pool()),
            None => None,
        };

        let cache: Arc<dyn HierarchyStore> =
            Arc::new(CacheManager::new(&config.cache, pool.as_ref())?);

        let routes: Arc<dyn RouteStore> = match &pool {
            Some(pool) => Arc::new(RouteConfigRepository::new(pool.clone())),
            None => Arc::new(ConfiguredRoutes::new(&config.routes)),
        };

        let drive = drivehub_storage::connect(&config.drive).await?;
        info!(
            drive = drive.provider_type(),
            cache = cache.backend(),
            "Services initialized"
        );

        let builder = HierarchyBuilder::new(drive, config.hierarchy.max_concurrent_listings);
        let service = HierarchyService::new(
            builder,
            cache.clone(),
            RouteService::new(routes, cache.clone()),
            &config.hierarchy,
            &config.cache,
        );

        Ok(Self {
            pool,
            cache,
            service,
        })
    }

    /// The database pool, or a configuration error naming the operation.
    pub fn require_pool(&self, operation: &str) -> Result<&PgPool, AppError> {
        self.pool.as_ref().ok_or_else(|| {
            AppError::configuration(format!("{operation} requires a [database] section"))
        })
    }
}
