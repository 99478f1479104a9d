//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod cache;
pub mod drive;
pub mod hierarchy;
pub mod logging;
pub mod route;

use serde::{Deserialize, Serialize};
use tracing::debug;

use self::cache::CacheConfig;
use self::drive::DriveConfig;
use self::hierarchy::HierarchyConfig;
use self::logging::LoggingConfig;
use self::route::RouteDefinition;

use crate::error::AppError;

/// Root application configuration.
///
/// Every section has defaults, so an empty configuration deserializes into
/// a working in-memory setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings. Required only for the `postgres`
    /// cache provider and database-backed routes.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// Hierarchy cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// External drive settings.
    #[serde(default)]
    pub drive: DriveConfig,
    /// Hierarchy builder settings.
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Statically configured route mappings.
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml` (if present), the given file (if any),
    /// and environment variables prefixed with `DRIVEHUB__`.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = path {
            debug!(path, "Adding configuration file");
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DRIVEHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a TOML string (defaults fill the gaps).
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(AppError::from)
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.cache.provider, "memory");
        assert_eq!(config.cache.hierarchy_ttl_seconds, 2 * 60 * 60);
        assert_eq!(config.cache.route_ttl_seconds, 4 * 60 * 60);
        assert_eq!(config.drive.provider, "local");
        assert_eq!(config.hierarchy.default_max_depth, 5);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_routes_section() {
        let config = AppConfig::from_toml(
            r#"
            [hierarchy]
            max_concurrent_listings = 2

            [[routes]]
            route_type = "products"
            route_subtype = "brochures"
            root_folder_id = "1AbC"
            display_name = "Brochures"

            [[routes]]
            route_type = "training"
            root_folder_id = "2DeF"
            is_active = false
            "#,
        )
        .unwrap();

        assert_eq!(config.hierarchy.max_concurrent_listings, 2);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].route_subtype.as_deref(), Some("brochures"));
        assert!(config.routes[0].is_active);
        assert!(!config.routes[1].is_active);
        assert_eq!(config.routes[1].route_subtype, None);
    }
}
