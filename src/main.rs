mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv(); // load .env if present

    let settings = commands::Settings::resolve(&cli);
    info!(api_url = %settings.config.api_url, "rosterctl starting");

    if let Err(e) = commands::run(cli, settings).await {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}
