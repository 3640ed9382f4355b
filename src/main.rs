//! # CRM API Main Entry Point
//!
//! Loads configuration, initializes telemetry and the database pool, then
//! dispatches to the requested command.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crm::migration::{Migrator, MigratorTrait};
use crm::{config::ConfigLoader, db::init_pool, seeds, server::run_server, telemetry};

#[derive(Parser)]
#[command(name = "crm", about = "CRM data service", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Seed reference data (industries)
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new().load()?;
    config.validate()?;
    telemetry::init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted) = config.redacted_json() {
        tracing::debug!(config = %redacted, "Effective configuration");
    }

    let db = init_pool(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config, db).await,
        Command::Migrate => {
            Migrator::up(&db, None).await?;
            tracing::info!("Migrations applied");
            Ok(())
        }
        Command::Seed => {
            seeds::seed_industries(&db).await?;
            tracing::info!("Seeding complete");
            Ok(())
        }
    }
}
