use alliance_importer::config::{self, Config, ConfigOverrides};
use alliance_importer::infra::MongoStore;
use alliance_importer::logging;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clear-alliances")]
#[command(about = "Delete all imported alliances and memberships so the importer can run again")]
struct Cli {
    /// TOML config file (default: importer.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Database name; overrides MONGO_DB and the config file
    #[arg(long)]
    database: Option<String>,
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(ConfigOverrides {
        database: cli.database,
        ..ConfigOverrides::default()
    });

    let collections = &config.database.collections;
    if !cli.yes {
        println!(
            "⚠️  WARNING: This will delete ALL documents from '{}' and '{}' in database '{}'!",
            collections.alliances, collections.alliance_members, config.database.name
        );
        println!("Press Enter to continue or Ctrl+C to cancel...");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
    }

    let url = config::mongodb_url()?;
    let store = MongoStore::connect(&url, &config.database)
        .await
        .context("Failed to connect to MongoDB")?;

    println!("🗑️  Clearing alliances...");
    let result = store.clear_imported().await;
    store.shutdown().await;

    let (alliances, memberships) = result?;
    println!("✅ Removed {alliances} alliances and {memberships} memberships");
    Ok(())
}
