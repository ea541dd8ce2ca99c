//! Strictly Tafl - terminal board front-end.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use strictly_tafl::TaflConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = TaflConfig::load_or_default(&cli.config)?.with_overrides(
        cli.variant,
        cli.first_player,
        cli.log_file,
    );

    strictly_tafl::tui::run_tui(config).await
}
