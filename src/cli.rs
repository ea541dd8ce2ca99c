//! Command-line interface for strictly_tafl.

use clap::Parser;
use strictly_tafl::{Player, Variant};

/// Strictly Tafl - Tafl board front-end in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_tafl")]
#[command(about = "Play Tafl board games in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "strictly_tafl.toml")]
    pub config: std::path::PathBuf,

    /// Variant to play (hnefatafl, tawlbwrdd, tablut, brandubh)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Side that moves first (black or white)
    #[arg(long)]
    pub first_player: Option<Player>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}
