use anyhow::Result;
use clap::Parser;
use tracing::info;

use fleet_console::cli::{Cli, Console};
use fleet_console::config::Config;
use fleet_console::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        service = %config.service.base_url,
        "Starting Fleet Console"
    );

    let console = Console::open(&config, cli.json).await?;

    match console.execute(cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(failed) => {
            tracing::debug!(error = ?failed.source, "Command failed");
            eprintln!("{}", failed.message);
            std::process::exit(1);
        }
    }
}
