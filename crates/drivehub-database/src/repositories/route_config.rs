//! Route configuration repository implementation.

use sqlx::PgPool;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_entity::route::RouteConfig;

/// Data required to create a route mapping.
#[derive(Debug, Clone)]
pub struct NewRouteConfig {
    /// Route type.
    pub route_type: String,
    /// Optional route subtype.
    pub route_subtype: Option<String>,
    /// Drive folder at the root of the route's content.
    pub root_folder_id: String,
    /// Human-readable label.
    pub display_name: Option<String>,
    /// Route-specific depth override.
    pub max_depth: Option<i32>,
}

/// Repository for the `route_configs` table.
#[derive(Debug, Clone)]
pub struct RouteConfigRepository {
    pool: PgPool,
}

impl RouteConfigRepository {
    /// Create a new route config repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the route for a type and optional subtype, active or not.
    pub async fn find_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<Option<RouteConfig>> {
        sqlx::query_as::<_, RouteConfig>(
            "SELECT * FROM route_configs \
             WHERE route_type = $1 AND route_subtype IS NOT DISTINCT FROM $2",
        )
        .bind(route_type)
        .bind(route_subtype)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find route", e))
    }

    /// List every route.
    pub async fn list(&self) -> AppResult<Vec<RouteConfig>> {
        sqlx::query_as::<_, RouteConfig>(
            "SELECT * FROM route_configs ORDER BY route_type ASC, route_subtype ASC NULLS FIRST",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list routes", e))
    }

    /// Create a route.
    pub async fn create(&self, data: &NewRouteConfig) -> AppResult<RouteConfig> {
        sqlx::query_as::<_, RouteConfig>(
            "INSERT INTO route_configs \
                (route_type, route_subtype, root_folder_id, display_name, max_depth) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.route_type)
        .bind(&data.route_subtype)
        .bind(&data.root_folder_id)
        .bind(&data.display_name)
        .bind(data.max_depth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("route_configs_type_subtype_key") =>
            {
                AppError::validation(format!(
                    "Route '{}' already exists",
                    data.route_type
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create route", e),
        })
    }

    /// Activate or deactivate a route. Returns `false` if no route matched.
    pub async fn set_active(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
        is_active: bool,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE route_configs SET is_active = $3, updated_at = NOW() \
             WHERE route_type = $1 AND route_subtype IS NOT DISTINCT FROM $2",
        )
        .bind(route_type)
        .bind(route_subtype)
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update route", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a route. Returns `false` if no route matched.
    pub async fn delete(&self, route_type: &str, route_subtype: Option<&str>) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM route_configs \
             WHERE route_type = $1 AND route_subtype IS NOT DISTINCT FROM $2",
        )
        .bind(route_type)
        .bind(route_subtype)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete route", e))?;
        Ok(result.rows_affected() > 0)
    }
}
