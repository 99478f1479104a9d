//! Cache key construction for hierarchy entries.
//!
//! Keys are a value type rather than ad-hoc strings so that two lookups
//! share an entry only when their route (or root folder) and depth agree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use drivehub_core::error::AppError;

/// Prefix applied to all rendered hierarchy cache keys.
const PREFIX: &str = "drivehub:hierarchy";

/// Identifies one cacheable hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CacheKey {
    /// A hierarchy reached through a route mapping.
    Route {
        /// Route type.
        route_type: String,
        /// Optional route subtype.
        route_subtype: Option<String>,
        /// Depth limit of the build.
        max_depth: u32,
    },
    /// A hierarchy fetched directly by root folder ID.
    Folder {
        /// Root folder ID.
        root_folder_id: String,
        /// Depth limit of the build.
        max_depth: u32,
    },
}

impl CacheKey {
    /// Key for a route-mapped hierarchy.
    pub fn route(route_type: &str, route_subtype: Option<&str>, max_depth: u32) -> Self {
        Self::Route {
            route_type: route_type.to_string(),
            route_subtype: route_subtype.map(str::to_string),
            max_depth,
        }
    }

    /// Key for a hierarchy fetched by root folder.
    pub fn folder(root_folder_id: &str, max_depth: u32) -> Self {
        Self::Folder {
            root_folder_id: root_folder_id.to_string(),
            max_depth,
        }
    }

    /// Depth limit encoded in the key.
    pub fn max_depth(&self) -> u32 {
        match self {
            Self::Route { max_depth, .. } | Self::Folder { max_depth, .. } => *max_depth,
        }
    }

    /// Route type and subtype, for route keys.
    pub fn route_parts(&self) -> Option<(&str, Option<&str>)> {
        match self {
            Self::Route {
                route_type,
                route_subtype,
                ..
            } => Some((route_type, route_subtype.as_deref())),
            Self::Folder { .. } => None,
        }
    }

    /// Render the key as stored by the cache backends.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route {
                route_type,
                route_subtype,
                max_depth,
            } => write!(
                f,
                "{PREFIX}:route:{}:{}:d{max_depth}",
                escape(route_type),
                route_subtype.as_deref().map(escape).unwrap_or_else(|| "-".to_string()),
            ),
            Self::Folder {
                root_folder_id,
                max_depth,
            } => write!(
                f,
                "{PREFIX}:folder:{}:d{max_depth}",
                escape(root_folder_id)
            ),
        }
    }
}

impl FromStr for CacheKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::validation(format!("Invalid cache key: '{s}'"));
        let rest = s
            .strip_prefix(PREFIX)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = rest.split(':').collect();
        let depth = |raw: &str| {
            raw.strip_prefix('d')
                .and_then(|d| d.parse::<u32>().ok())
                .ok_or_else(invalid)
        };

        match parts.as_slice() {
            ["route", route_type, subtype, d] => Ok(Self::Route {
                route_type: unescape(route_type),
                route_subtype: (*subtype != "-").then(|| unescape(subtype)),
                max_depth: depth(d)?,
            }),
            ["folder", root, d] => Ok(Self::Folder {
                root_folder_id: unescape(root),
                max_depth: depth(d)?,
            }),
            _ => Err(invalid()),
        }
    }
}

/// Escape the key separator (and the escape character, and the bare `-`
/// placeholder) so components never collide.
fn escape(component: &str) -> String {
    if component == "-" {
        return "%2D".to_string();
    }
    component.replace('%', "%25").replace(':', "%3A")
}

fn unescape(component: &str) -> String {
    component
        .replace("%3A", ":")
        .replace("%2D", "-")
        .replace("%25", "%")
}
