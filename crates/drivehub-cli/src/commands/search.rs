//! Hierarchy search command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use super::parse_route;
use crate::context::Context;
use crate::output::{self, OutputFormat};
use drivehub_core::error::AppError;
use drivehub_service::{SearchOptions, SearchResult};

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for
    pub query: String,
    /// Search under this folder
    #[arg(long, conflicts_with = "route", required_unless_present = "route")]
    pub root: Option<String>,
    /// Search the hierarchy of this route (TYPE or TYPE/SUBTYPE)
    #[arg(long)]
    pub route: Option<String>,
    /// Maximum depth of the searched hierarchy
    #[arg(short, long)]
    pub depth: Option<u32>,
    /// Case-sensitive matching
    #[arg(long)]
    pub match_case: bool,
    /// Also match file contents
    #[arg(long)]
    pub content: bool,
    /// MIME types eligible for content search (repeatable)
    #[arg(long = "file-type")]
    pub file_types: Vec<String>,
    /// Stop after this many matches
    #[arg(long, default_value_t = 100)]
    pub limit: usize,
}

/// Search result display row
#[derive(Debug, Serialize, Tabled)]
struct ResultRow {
    /// Name
    name: String,
    /// Role
    role: String,
    /// ID
    id: String,
    /// Location
    path: String,
}

impl From<&SearchResult> for ResultRow {
    fn from(result: &SearchResult) -> Self {
        let path: Vec<&str> = result.path.iter().map(|s| s.name.as_str()).collect();
        Self {
            name: result.item.display_name().to_string(),
            role: result.item.role().to_string(),
            id: result.item.id().to_string(),
            path: path.join(" / "),
        }
    }
}

/// Execute the search command
pub async fn execute(
    args: &SearchArgs,
    ctx: &Context,
    format: OutputFormat,
) -> Result<(), AppError> {
    let hierarchy = match (&args.route, &args.root) {
        (Some(route), _) => {
            let (route_type, route_subtype) = parse_route(route)?;
            ctx.service
                .get_route_hierarchy(&route_type, route_subtype.as_deref(), args.depth, false)
                .await?
        }
        (None, Some(root)) => {
            ctx.service
                .get_folder_hierarchy(root, args.depth, false)
                .await?
        }
        (None, None) => {
            return Err(AppError::validation("Either --root or --route is required"));
        }
    };

    let options = SearchOptions {
        match_case: args.match_case,
        search_in_content: args.content,
        file_types: args.file_types.clone(),
        max_results: args.limit,
    };
    let response = ctx
        .service
        .search(&hierarchy.root, &args.query, &options)
        .await?;

    match format {
        OutputFormat::Json => output::print_item(&response, format),
        OutputFormat::Table => {
            let rows: Vec<ResultRow> = response.results.iter().map(ResultRow::from).collect();
            output::print_list(&rows, format);
            if response.count >= args.limit {
                output::print_warning(&format!("Stopped after {} matches", args.limit));
            }
        }
    }
    Ok(())
}
