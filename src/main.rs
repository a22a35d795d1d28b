//! MemberHub administration console.
//!
//! Loads configuration, sets up logging and hands off to the CLI.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use memberhub_cli::Cli;
use memberhub_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    if let Err(e) = cli.execute(config).await {
        tracing::debug!(kind = %e.kind, code = ?e.code, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. Output goes to stderr so tables and JSON on
/// stdout stay clean.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
