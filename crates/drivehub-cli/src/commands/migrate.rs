//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use drivehub_core::config::AppConfig;
use drivehub_core::error::AppError;
use drivehub_database::DatabasePool;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check database connectivity
    Check,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = DatabasePool::from_app_config(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            drivehub_database::migration::run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Check => {
            if pool.health_check().await? {
                output::print_success("Database is reachable.");
            } else {
                output::print_warning("Database answered unexpectedly.");
            }
        }
    }

    Ok(())
}
