//! API Gateway - HTTP REST API for the product catalog.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_service_lib::MigrateAction;
use gateway_lib::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "Product catalog HTTP API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Load products from a JSON file into an empty table
    Seed {
        #[arg(long, env = "CATALOG_SEED_FILE", default_value = "seed/products.json")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            // Flags win over GATEWAY_HOST / GATEWAY_PORT
            let config = GatewayConfig::from_env();
            let host = host.unwrap_or(config.host);
            let port = port.unwrap_or(config.port);
            gateway_lib::run(&host, port).await?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            catalog_service_lib::run_migrations(migrate_action).await?;
        }
        Commands::Seed { file } => {
            let seeded = catalog_service_lib::run_seed(&file).await?;
            println!("Seeded {} products", seeded);
        }
    }

    Ok(())
}
