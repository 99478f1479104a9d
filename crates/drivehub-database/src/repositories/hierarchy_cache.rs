//! Hierarchy cache repository implementation.

use sqlx::PgPool;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_entity::cache::{CacheEntry, CacheWrite};

/// Repository for the `hierarchy_cache` table.
#[derive(Debug, Clone)]
pub struct HierarchyCacheRepository {
    pool: PgPool,
}

impl HierarchyCacheRepository {
    /// Create a new hierarchy cache repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an entry by its rendered cache key.
    pub async fn find_by_key(&self, cache_key: &str) -> AppResult<Option<CacheEntry>> {
        sqlx::query_as::<_, CacheEntry>("SELECT * FROM hierarchy_cache WHERE cache_key = $1")
            .bind(cache_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find cache entry", e)
            })
    }

    /// Insert or fully replace the entry for a key.
    ///
    /// The row is replaced in a single statement, so readers never observe
    /// a mix of old and new fields. `access_count` restarts at 1.
    pub async fn upsert(&self, cache_key: &str, data: &CacheWrite) -> AppResult<CacheEntry> {
        sqlx::query_as::<_, CacheEntry>(
            "INSERT INTO hierarchy_cache \
                (cache_key, route_type, route_subtype, root_folder_id, max_depth, \
                 hierarchy_data, item_count, build_time_ms, access_count, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 1, NOW()) \
             ON CONFLICT (cache_key) DO UPDATE SET \
                route_type = EXCLUDED.route_type, \
                route_subtype = EXCLUDED.route_subtype, \
                root_folder_id = EXCLUDED.root_folder_id, \
                max_depth = EXCLUDED.max_depth, \
                hierarchy_data = EXCLUDED.hierarchy_data, \
                item_count = EXCLUDED.item_count, \
                build_time_ms = EXCLUDED.build_time_ms, \
                access_count = 1, \
                updated_at = NOW() \
             RETURNING *",
        )
        .bind(cache_key)
        .bind(&data.route_type)
        .bind(&data.route_subtype)
        .bind(&data.root_folder_id)
        .bind(data.max_depth)
        .bind(&data.hierarchy_data)
        .bind(data.item_count)
        .bind(data.build_time_ms)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert cache entry", e))
    }

    /// Increment the access counter of an entry by cache key.
    pub async fn increment_access_count_by_key(&self, cache_key: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE hierarchy_cache SET access_count = access_count + 1 WHERE cache_key = $1",
        )
        .bind(cache_key)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment access count", e)
        })?;
        Ok(())
    }

    /// Delete every entry derived from a route. Returns the number removed.
    pub async fn delete_for_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM hierarchy_cache \
             WHERE route_type = $1 AND route_subtype IS NOT DISTINCT FROM $2",
        )
        .bind(route_type)
        .bind(route_subtype)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete route cache entries", e)
        })?;
        Ok(result.rows_affected())
    }

    /// List all entries, most recently rebuilt first.
    pub async fn list(&self) -> AppResult<Vec<CacheEntry>> {
        sqlx::query_as::<_, CacheEntry>("SELECT * FROM hierarchy_cache ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list cache entries", e)
            })
    }
}
