use alliance_importer::config::{self, Config, ConfigOverrides, UnknownAirlinePolicy};
use alliance_importer::infra::MongoStore;
use alliance_importer::logging;
use alliance_importer::source::load_alliances;
use alliance_importer::types::{AllianceInput, UnresolvedAirline};
use alliance_importer::AllianceImporter;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "alliance_importer")]
#[command(about = "Import airline alliances and their member airlines into MongoDB")]
#[command(version = "0.1.0")]
struct Cli {
    /// Alliances JSON file (default: alliances.json)
    #[arg(long)]
    file: Option<PathBuf>,
    /// TOML config file (default: importer.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Database name; overrides MONGO_DB and the config file
    #[arg(long)]
    database: Option<String>,
    /// What to do with airline codes missing from the airlines collection
    #[arg(long, value_enum)]
    on_unknown_airline: Option<UnknownAirlinePolicy>,
    /// Resolve every airline code but write nothing
    #[arg(long)]
    dry_run: bool,
}

fn print_skipped(skipped: &[UnresolvedAirline]) {
    if skipped.is_empty() {
        return;
    }
    println!("\n⚠️  Unknown airline codes skipped:");
    print_codes(skipped);
}

fn print_unresolved(unresolved: &[UnresolvedAirline]) {
    if unresolved.is_empty() {
        return;
    }
    println!("\n⚠️  Unknown airline codes:");
    print_codes(unresolved);
}

fn print_codes(entries: &[UnresolvedAirline]) {
    for entry in entries {
        println!("   - {} ({})", entry.iata, entry.alliance);
    }
}

async fn run_import(
    store: Arc<MongoStore>,
    config: &Config,
    alliances: &[AllianceInput],
    dry_run: bool,
) -> Result<()> {
    let importer = AllianceImporter::with_store(store, config.import.on_unknown_airline);
    info!(
        database = %config.database.name,
        policy = ?importer.policy(),
        dry_run,
        "Starting alliance import"
    );

    if dry_run {
        let plan = importer.resolve_all(alliances).await?;
        println!("\n📋 Dry run for {}:", config.import.input_path.display());
        println!("   Alliances: {}", plan.alliances.len());
        println!("   Memberships: {}", plan.memberships.len());
        print_unresolved(&plan.skipped);
        println!("\nNothing was written.");
        plan.ensure_importable(importer.policy())?;
        return Ok(());
    }

    println!(
        "📥 Importing {} alliances into '{}'...",
        alliances.len(),
        config.database.name
    );
    let summary = importer.run(alliances).await?;

    println!("\n📊 Import Results:");
    println!("   Alliances inserted: {}", summary.alliances_inserted);
    println!("   Memberships inserted: {}", summary.memberships_inserted);
    print_skipped(&summary.skipped);
    println!("\n✅ Import completed");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(ConfigOverrides {
        database: cli.database,
        input_path: cli.file,
        on_unknown_airline: cli.on_unknown_airline,
    });

    // Bad input aborts before a connection is opened
    let alliances = load_alliances(&config.import.input_path)?;

    let url = config::mongodb_url()?;
    let store = Arc::new(
        MongoStore::connect(&url, &config.database)
            .await
            .context("Failed to connect to MongoDB")?,
    );

    let result = run_import(store.clone(), &config, &alliances, cli.dry_run).await;
    if let Err(e) = &result {
        error!("Alliance import failed: {:#}", e);
    }

    store.shutdown().await;
    result
}
