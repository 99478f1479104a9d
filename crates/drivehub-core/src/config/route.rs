//! Statically configured route mappings.

use serde::{Deserialize, Serialize};

/// Maps a portal route to the drive folder holding its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Route type, e.g. `"products"`.
    pub route_type: String,
    /// Optional route subtype, e.g. `"brochures"`.
    #[serde(default)]
    pub route_subtype: Option<String>,
    /// Drive folder ID at the root of this route's content.
    pub root_folder_id: String,
    /// Human-readable label.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Route-specific depth override.
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Inactive routes resolve as not configured.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
