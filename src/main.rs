use clap::Parser;
use hydro_control::domain::ports::SessionSettings;
use hydro_control::utils::error::ErrorSeverity;
use hydro_control::utils::{logger, validation::Validate};
use hydro_control::{CliConfig, ConsoleSession, HydroError, Prompter, SqliteStore};

fn exit_code(e: &HydroError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_failure(context: &str, e: &HydroError) {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting hydro-control");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        report_failure("Configuration validation failed", &e);
        std::process::exit(1);
    }

    // 不存檔時不必連資料庫
    let store = if config.persist_enabled() {
        match SqliteStore::connect(&config).await {
            Ok(store) => Some(store),
            Err(e) => {
                report_failure("Could not open the database", &e);
                std::process::exit(exit_code(&e).max(1));
            }
        }
    } else {
        None
    };

    let session = ConsoleSession::new(&config, store.clone());
    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());

    let result = session.run(&mut prompter).await;

    if let Some(store) = store {
        store.close().await;
    }

    match result {
        Ok(summary) => {
            if summary.persistence_failures > 0 {
                tracing::warn!(
                    "⚠️ {} neighborhood(s) could not be saved",
                    summary.persistence_failures
                );
                std::process::exit(2);
            }
        }
        Err(e) => {
            report_failure("Session aborted", &e);
            let code = exit_code(&e);
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
