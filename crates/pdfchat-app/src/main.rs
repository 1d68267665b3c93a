use anyhow::Result;
use clap::Parser;

use pdfchat::app::{run_repl_mode, setup_from_cli};
use pdfchat::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let app_config = setup_from_cli(&cli)?;

    run_repl_mode(app_config).await
}
