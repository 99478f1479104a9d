//! Route resolution and administration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use drivehub_cache::HierarchyStore;
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_entity::route::RouteConfig;

use super::store::RouteStore;

/// Outcome of deleting a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDeletion {
    /// `type` or `type/subtype`.
    pub route: String,
    /// Cache entries removed with the route.
    pub cache_entries_removed: u64,
}

/// Resolves route mappings and keeps the cache in step with route changes.
#[derive(Debug, Clone)]
pub struct RouteService {
    routes: Arc<dyn RouteStore>,
    cache: Arc<dyn HierarchyStore>,
}

impl RouteService {
    /// Create a route service.
    pub fn new(routes: Arc<dyn RouteStore>, cache: Arc<dyn HierarchyStore>) -> Self {
        Self { routes, cache }
    }

    /// Resolve an active route.
    ///
    /// A missing or inactive route is a `NotConfigured` error.
    pub async fn resolve(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<RouteConfig> {
        let label = match route_subtype {
            Some(sub) => format!("{route_type}/{sub}"),
            None => route_type.to_string(),
        };
        match self.routes.find_route(route_type, route_subtype).await? {
            Some(route) if route.is_active => Ok(route),
            Some(_) => Err(AppError::not_configured(format!(
                "Route '{label}' is inactive"
            ))),
            None => Err(AppError::not_configured(format!(
                "Route '{label}' is not configured"
            ))),
        }
    }

    /// List every route, active or not.
    pub async fn list(&self) -> AppResult<Vec<RouteConfig>> {
        self.routes.list_routes().await
    }

    /// Delete a route and every cache entry derived from it.
    pub async fn delete_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<RouteDeletion> {
        let route = self
            .routes
            .find_route(route_type, route_subtype)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Route '{route_type}' not found")))?;

        if !self.routes.delete_route(route_type, route_subtype).await? {
            return Err(AppError::not_found(format!(
                "Route '{}' not found",
                route.label()
            )));
        }

        let removed = match self.cache.delete_for_route(route_type, route_subtype).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(route = %route.label(), error = %e, "Route deleted but its cache entries were not");
                0
            }
        };

        info!(route = %route.label(), cache_entries_removed = removed, "Deleted route");
        Ok(RouteDeletion {
            route: route.label(),
            cache_entries_removed: removed,
        })
    }
}
