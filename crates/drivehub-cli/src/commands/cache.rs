//! Hierarchy cache inspection commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::context::Context;
use crate::output::{self, OutputFormat};
use drivehub_core::error::AppError;
use drivehub_entity::cache::CacheEntry;

/// Arguments for cache commands
#[derive(Debug, Args)]
pub struct CacheArgs {
    /// Cache subcommand
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Cache subcommands
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// List cached hierarchies, most recently built first
    List,
    /// Show one cached hierarchy's metadata
    Show {
        /// Rendered cache key, as printed by `cache list`
        key: String,
    },
}

/// Cache entry display row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// Cache key
    key: String,
    /// Root folder
    root_folder: String,
    /// Depth
    depth: i32,
    /// Items
    items: i64,
    /// Hits
    hits: i64,
    /// Age
    age: String,
}

impl From<&CacheEntry> for EntryRow {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            key: entry.cache_key.clone(),
            root_folder: entry.root_folder_id.clone(),
            depth: entry.max_depth,
            items: entry.item_count,
            hits: entry.access_count,
            age: format!("{}s", entry.age(Utc::now()).num_seconds().max(0)),
        }
    }
}

/// Execute cache commands
pub async fn execute(args: &CacheArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let entries = ctx.cache.list().await?;

    match &args.command {
        CacheCommand::List => {
            let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
            output::print_list(&rows, format);
        }
        CacheCommand::Show { key } => {
            let entry = entries
                .iter()
                .find(|e| &e.cache_key == key)
                .ok_or_else(|| AppError::not_found(format!("No cache entry '{key}'")))?;

            match format {
                OutputFormat::Json => output::print_item(entry, format),
                OutputFormat::Table => {
                    println!("Cache entry {}", entry.cache_key);
                    output::print_kv("Backend", ctx.cache.backend());
                    output::print_kv(
                        "Route",
                        &match (&entry.route_type, &entry.route_subtype) {
                            (Some(t), Some(s)) => format!("{t}/{s}"),
                            (Some(t), None) => t.clone(),
                            _ => "-".to_string(),
                        },
                    );
                    output::print_kv("Root folder", &entry.root_folder_id);
                    output::print_kv("Max depth", &entry.max_depth.to_string());
                    output::print_kv("Items", &entry.item_count.to_string());
                    output::print_kv("Build time", &format!("{}ms", entry.build_time_ms));
                    output::print_kv("Hits", &entry.access_count.to_string());
                    output::print_kv("Created", &entry.created_at.to_rfc3339());
                    output::print_kv("Updated", &entry.updated_at.to_rfc3339());
                }
            }
        }
    }

    Ok(())
}
