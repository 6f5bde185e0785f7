//! Blob Indexer Main Entry Point
//!
//! Provisions the search index, blob-storage data source and indexer, then
//! requests an indexer run.

use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process;

use blob_indexer::config::{DEFAULT_SETTINGS_FILE, SETTINGS_PATH_ENV};
use blob_indexer::{connect_to_search_service, run_with, AppError, AppSettings, ProvisioningReport};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("blob_indexer=info,blob_indexer_repository=info"));

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init();
    }
}

async fn run() -> Result<ProvisioningReport, AppError> {
    let path = env::var(SETTINGS_PATH_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string());
    let mut settings = AppSettings::load(&path)?;
    settings.apply_env_overrides();

    run_with(&settings, connect_to_search_service).await
}

/// Keep the console open until the user acknowledges, when there is one.
fn wait_for_user() {
    if env::var_os("BLOB_INDEXER_NO_PROMPT").is_some() || !io::stdin().is_terminal() {
        return;
    }

    print!("Press Enter to continue...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!(
        service_version = env!("CARGO_PKG_VERSION"),
        "Starting blob indexer provisioning"
    );

    match run().await {
        Ok(report) => {
            info!(
                index_replaced = report.index_replaced,
                indexer_reset = report.indexer_reset,
                run_started = report.run.is_started(),
                "Provisioning completed"
            );
            wait_for_user();
            process::exit(0);
        }
        Err(e) => {
            error!(error = %e, "Provisioning failed");
            process::exit(e.exit_code());
        }
    }
}
