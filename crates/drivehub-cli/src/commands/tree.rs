//! Folder hierarchy command.

use clap::Args;

use crate::context::Context;
use crate::output::{self, OutputFormat};
use drivehub_core::error::AppError;
use drivehub_service::HierarchyResponse;

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Drive ID of the root folder
    pub folder_id: String,
    /// Maximum depth (defaults to hierarchy.default_max_depth)
    #[arg(short, long)]
    pub depth: Option<u32>,
    /// Rebuild even if a fresh cached copy exists
    #[arg(long)]
    pub refresh: bool,
}

/// Execute the tree command
pub async fn execute(args: &TreeArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let response = ctx
        .service
        .get_folder_hierarchy(&args.folder_id, args.depth, args.refresh)
        .await?;
    print_hierarchy(&response, format);
    Ok(())
}

/// Print a served hierarchy with its statistics.
pub fn print_hierarchy(response: &HierarchyResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_item(response, format),
        OutputFormat::Table => {
            output::print_tree(&response.root);
            println!();

            let stats = &response.stats;
            output::print_kv("Items", &stats.total_items.to_string());
            output::print_kv("Max depth", &stats.max_depth_reached.to_string());
            output::print_kv("From cache", &stats.from_cache.to_string());
            if let Some(age) = stats.cache_age_seconds {
                output::print_kv("Cache age", &format!("{age}s"));
            }
            if let Some(ms) = stats.build_time_ms {
                output::print_kv("Build time", &format!("{ms}ms"));
            }
            if stats.is_partial() {
                output::print_warning(&format!(
                    "Listing failed for {} folder(s): {}",
                    stats.failed_folders.len(),
                    stats.failed_folders.join(", ")
                ));
            }
        }
    }
}
