use chrono::{Local, NaiveDate};
use clap::Parser;
use hydro_control::adapters::csv_report::write_report_file;
use hydro_control::config::batch_config::BatchConfig;
use hydro_control::utils::{logger, validation::Validate};
use hydro_control::{BatchImporter, SqliteStore};

#[derive(Parser)]
#[command(name = "batch_import")]
#[command(about = "Import neighborhood readings from a TOML file")]
struct Args {
    /// Path to TOML batch file
    #[arg(short, long, default_value = "readings.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Capture date for stored readings (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Override the CSV report path from the batch file
    #[arg(long)]
    report: Option<String>,

    /// Classify only, do not write to the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loading batch file from: {}", args.config);

    let config = match BatchConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load batch file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Batch file validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let store = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written to the database");
        None
    } else {
        match SqliteStore::connect(&config).await {
            Ok(store) => Some(store),
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                std::process::exit(2);
            }
        }
    };

    let captured_on = args.date.unwrap_or_else(|| Local::now().date_naive());
    let importer = BatchImporter::new(store.clone(), config.population_unit(), captured_on);
    let summary = importer.run(&config.neighborhoods).await;

    if let Some(store) = store {
        store.close().await;
    }

    let report_path = args.report.as_deref().or(config.report_path());
    if let Some(path) = report_path {
        if let Err(e) = write_report_file(path, &summary.rows) {
            tracing::error!("❌ Report export failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if summary.has_failures() {
        std::process::exit(2);
    }
    Ok(())
}
