//! rlm Entry Point
//!
//! Configuration is loaded from environment variables (via .env file).
//! Command-line arguments override environment variables.

use clap::Parser;
use rlm_cli::{handler, Cli};
use rlm_core::telemetry::{init_logging, LogConfig, LogLevel};

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { cli.log_level };
    let log_config = LogConfig::default()
        .with_level(level)
        .with_format(cli.log_format);
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = handler::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
