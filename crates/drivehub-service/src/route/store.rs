//! Route sources: the database or the configuration file.

use async_trait::async_trait;
use tokio::sync::RwLock;

use drivehub_core::config::route::RouteDefinition;
use drivehub_core::result::AppResult;
use drivehub_database::repositories::RouteConfigRepository;
use drivehub_entity::route::RouteConfig;

/// Where route mappings are read from.
#[async_trait]
pub trait RouteStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a route by type and subtype, active or not.
    async fn find_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<Option<RouteConfig>>;

    /// List every route.
    async fn list_routes(&self) -> AppResult<Vec<RouteConfig>>;

    /// Delete a route. Returns `false` if no route matched.
    async fn delete_route(&self, route_type: &str, route_subtype: Option<&str>)
    -> AppResult<bool>;
}

#[async_trait]
impl RouteStore for RouteConfigRepository {
    async fn find_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<Option<RouteConfig>> {
        RouteConfigRepository::find_route(self, route_type, route_subtype).await
    }

    async fn list_routes(&self) -> AppResult<Vec<RouteConfig>> {
        self.list().await
    }

    async fn delete_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<bool> {
        self.delete(route_type, route_subtype).await
    }
}

/// Routes from `[[routes]]` in the configuration file, held in memory.
///
/// Deletions last for the lifetime of the process.
#[derive(Debug, Default)]
pub struct ConfiguredRoutes {
    routes: RwLock<Vec<RouteConfig>>,
}

impl ConfiguredRoutes {
    /// Build from configuration definitions.
    pub fn new(definitions: &[RouteDefinition]) -> Self {
        Self::from_routes(definitions.iter().map(RouteConfig::from_definition).collect())
    }

    /// Build from ready-made routes.
    pub fn from_routes(routes: Vec<RouteConfig>) -> Self {
        Self {
            routes: RwLock::new(routes),
        }
    }
}

#[async_trait]
impl RouteStore for ConfiguredRoutes {
    async fn find_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<Option<RouteConfig>> {
        Ok(self
            .routes
            .read()
            .await
            .iter()
            .find(|r| r.matches(route_type, route_subtype))
            .cloned())
    }

    async fn list_routes(&self) -> AppResult<Vec<RouteConfig>> {
        Ok(self.routes.read().await.clone())
    }

    async fn delete_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<bool> {
        let mut routes = self.routes.write().await;
        let before = routes.len();
        routes.retain(|r| !r.matches(route_type, route_subtype));
        Ok(routes.len() != before)
    }
}
