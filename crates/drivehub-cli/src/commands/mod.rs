//! CLI command definitions and dispatch.

pub mod cache;
pub mod config;
pub mod migrate;
pub mod route;
pub mod search;
pub mod tree;

use clap::{Parser, Subcommand};

use crate::context::Context;
use crate::output::OutputFormat;
use drivehub_core::config::AppConfig;
use drivehub_core::error::AppError;

/// DriveHub: build, cache and search content hierarchies from a drive
#[derive(Debug, Parser)]
#[command(name = "drivehub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file, merged over config/default.toml
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build or fetch the hierarchy under a folder
    Tree(tree::TreeArgs),
    /// Route mappings and their hierarchies
    Route(route::RouteArgs),
    /// Search a hierarchy by name or content
    Search(search::SearchArgs),
    /// Inspect the hierarchy cache
    Cache(cache::CacheArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, &config, self.format),
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Tree(args) => {
                tree::execute(args, &Context::build(&config).await?, self.format).await
            }
            Commands::Route(args) => {
                route::execute(args, &Context::build(&config).await?, self.format).await
            }
            Commands::Search(args) => {
                search::execute(args, &Context::build(&config).await?, self.format).await
            }
            Commands::Cache(args) => {
                cache::execute(args, &Context::build(&config).await?, self.format).await
            }
        }
    }
}

/// Split `type` or `type/subtype` into its parts.
pub fn parse_route(route: &str) -> Result<(String, Option<String>), AppError> {
    let (route_type, route_subtype) = match route.split_once('/') {
        Some((t, s)) => (t.trim(), Some(s.trim())),
        None => (route.trim(), None),
    };
    if route_type.is_empty() || route_subtype.is_some_and(str::is_empty) {
        return Err(AppError::validation(format!(
            "Invalid route '{route}', expected TYPE or TYPE/SUBTYPE"
        )));
    }
    Ok((route_type.to_string(), route_subtype.map(str::to_string)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route() {
        assert_eq!(
            parse_route("products/brochures").unwrap(),
            ("products".to_string(), Some("brochures".to_string()))
        );
        assert_eq!(parse_route("training").unwrap(), ("training".to_string(), None));
        assert!(parse_route("products/").is_err());
        assert!(parse_route("/x").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "drivehub",
            "--format",
            "json",
            "route",
            "get",
            "products/brochures",
            "--depth",
            "2",
            "--refresh",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Route(_)));
    }
}
