//! Route configuration model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maps a portal route to the drive folder that holds its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RouteConfig {
    /// Row identifier.
    pub id: Uuid,
    /// Route type, e.g. `products`.
    pub route_type: String,
    /// Optional route subtype.
    pub route_subtype: Option<String>,
    /// Drive folder at the root of the route's content.
    pub root_folder_id: String,
    /// Human-readable label.
    pub display_name: Option<String>,
    /// Route-specific depth override.
    pub max_depth: Option<i32>,
    /// Inactive routes resolve as not configured.
    pub is_active: bool,
    /// When the route was created.
    pub created_at: DateTime<Utc>,
    /// When the route was last updated.
    pub updated_at: DateTime<Utc>,
}

impl RouteConfig {
    /// Build a route from a configuration-file definition.
    pub fn from_definition(def: &drivehub_core::config::route::RouteDefinition) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            route_type: def.route_type.clone(),
            route_subtype: def.route_subtype.clone(),
            root_folder_id: def.root_folder_id.clone(),
            display_name: def.display_name.clone(),
            max_depth: def.max_depth.map(|d| d as i32),
            is_active: def.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this route answers to the given type and subtype.
    pub fn matches(&self, route_type: &str, route_subtype: Option<&str>) -> bool {
        self.route_type == route_type && self.route_subtype.as_deref() == route_subtype
    }

    /// `type` or `type/subtype`, for log and error messages.
    pub fn label(&self) -> String {
        match &self.route_subtype {
            Some(sub) => format!("{}/{}", self.route_type, sub),
            None => self.route_type.clone(),
        }
    }
}
