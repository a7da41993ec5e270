mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use pressroom_runtime::{init_logging, LoggingOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let mut logging = LoggingOptions::from_env("pr-cli");
    logging.default_filter = "warn".to_string();
    logging.stderr = true;
    let _guard = init_logging(&logging)?;

    let cli = cli::Cli::parse();
    commands::run(cli).await
}
