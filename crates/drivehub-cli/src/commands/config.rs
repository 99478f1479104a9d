//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use drivehub_core::config::AppConfig;
use drivehub_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Summarize the effective configuration
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            if let Some(db) = shown.database.as_mut() {
                db.url = mask_password(&db.url);
            }
            if !shown.drive.google.access_token.is_empty() {
                shown.drive.google.access_token = "****".to_string();
            }
            output::print_item(&shown, format);
        }
        ConfigCommand::Validate => {
            output::print_success("Configuration is valid");
            output::print_kv(
                "Database",
                &config
                    .database
                    .as_ref()
                    .map(|db| mask_password(&db.url))
                    .unwrap_or_else(|| "none".to_string()),
            );
            output::print_kv("Cache", &config.cache.provider);
            output::print_kv("Drive", &config.drive.provider);
            output::print_kv(
                "Default depth",
                &config.hierarchy.default_max_depth.to_string(),
            );
            output::print_kv("Configured routes", &config.routes.len().to_string());
            if config.cache.provider == "postgres" && config.database.is_none() {
                output::print_warning("cache.provider = \"postgres\" needs a [database] section");
            }
        }
    }

    Ok(())
}

/// Mask password in database URL for display
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if colon_pos > scheme_end {
                return format!("{}****{}", &url[..=colon_pos], &url[at_pos..]);
            }
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_password() {
        assert_eq!(
            mask_password("postgres://portal:secret@db/portal"),
            "postgres://portal:****@db/portal"
        );
        assert_eq!(mask_password("postgres://db/portal"), "postgres://db/portal");
    }
}
