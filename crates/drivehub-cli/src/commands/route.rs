//! Route mapping commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use super::parse_route;
use super::tree::print_hierarchy;
use crate::context::Context;
use crate::output::{self, OutputFormat};
use drivehub_core::error::AppError;
use drivehub_database::repositories::{NewRouteConfig, RouteConfigRepository};
use drivehub_entity::route::RouteConfig;

/// Arguments for route commands
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Route subcommand
    #[command(subcommand)]
    pub command: RouteCommand,
}

/// Route subcommands
#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Fetch the hierarchy for a route
    Get {
        /// TYPE or TYPE/SUBTYPE
        route: String,
        /// Maximum depth (defaults to the route's, then the configured default)
        #[arg(short, long)]
        depth: Option<u32>,
        /// Rebuild even if a fresh cached copy exists
        #[arg(long)]
        refresh: bool,
    },
    /// List route mappings
    List,
    /// Add a route mapping (database routes only)
    Add {
        /// TYPE or TYPE/SUBTYPE
        route: String,
        /// Drive ID of the route's root folder
        #[arg(short, long)]
        root: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Route-specific maximum depth
        #[arg(short, long)]
        depth: Option<i32>,
    },
    /// Activate a route (database routes only)
    Enable {
        /// TYPE or TYPE/SUBTYPE
        route: String,
    },
    /// Deactivate a route (database routes only)
    Disable {
        /// TYPE or TYPE/SUBTYPE
        route: String,
    },
    /// Delete a route and purge its cached hierarchies
    Delete {
        /// TYPE or TYPE/SUBTYPE
        route: String,
    },
}

/// Route display row
#[derive(Debug, Serialize, Tabled)]
struct RouteRow {
    /// Route
    route: String,
    /// Display name
    name: String,
    /// Root folder
    root_folder: String,
    /// Depth override
    depth: String,
    /// Active
    active: String,
}

impl From<&RouteConfig> for RouteRow {
    fn from(route: &RouteConfig) -> Self {
        Self {
            route: route.label(),
            name: route.display_name.clone().unwrap_or_default(),
            root_folder: route.root_folder_id.clone(),
            depth: route
                .max_depth
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            active: if route.is_active { "✓" } else { "" }.to_string(),
        }
    }
}

/// Execute route commands
pub async fn execute(args: &RouteArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        RouteCommand::Get {
            route,
            depth,
            refresh,
        } => {
            let (route_type, route_subtype) = parse_route(route)?;
            let response = ctx
                .service
                .get_route_hierarchy(&route_type, route_subtype.as_deref(), *depth, *refresh)
                .await?;
            print_hierarchy(&response, format);
        }
        RouteCommand::List => {
            let routes = ctx.service.routes().list().await?;
            let rows: Vec<RouteRow> = routes.iter().map(RouteRow::from).collect();
            output::print_list(&rows, format);
        }
        RouteCommand::Add {
            route,
            root,
            name,
            depth,
        } => {
            let (route_type, route_subtype) = parse_route(route)?;
            let repo = RouteConfigRepository::new(ctx.require_pool("Adding routes")?.clone());
            let created = repo
                .create(&NewRouteConfig {
                    route_type,
                    route_subtype,
                    root_folder_id: root.clone(),
                    display_name: name.clone(),
                    max_depth: *depth,
                })
                .await?;
            output::print_success(&format!(
                "Route '{}' added (root: {})",
                created.label(),
                created.root_folder_id
            ));
        }
        RouteCommand::Enable { route } => set_active(ctx, route, true).await?,
        RouteCommand::Disable { route } => set_active(ctx, route, false).await?,
        RouteCommand::Delete { route } => {
            let (route_type, route_subtype) = parse_route(route)?;
            let deletion = ctx
                .service
                .routes()
                .delete_route(&route_type, route_subtype.as_deref())
                .await?;
            output::print_success(&format!(
                "Route '{}' deleted, {} cached hierarchy(ies) purged",
                deletion.route,
                deletion.cache_entries_removed
            ));
        }
    }

    Ok(())
}

async fn set_active(ctx: &Context, route: &str, is_active: bool) -> Result<(), AppError> {
    let (route_type, route_subtype) = parse_route(route)?;
    let repo = RouteConfigRepository::new(ctx.require_pool("Changing route status")?.clone());
    if !repo
        .set_active(&route_type, route_subtype.as_deref(), is_active)
        .await?
    {
        return Err(AppError::not_found(format!("Route '{route}' not found")));
    }
    let state = if is_active { "activated" } else { "deactivated" };
    output::print_success(&format!("Route '{route}' {state}"));
    Ok(())
}
