//! CLI argument parsing for the viewer.

use std::path::PathBuf;

use clap::Parser;

/// Timebox Viewer command line.
#[derive(Parser, Debug, Clone, Default)]
#[command(about = "Interactive timebox queries over a time-series chart")]
pub struct ViewerArgs {
    /// CSV file with one row per (entity, period, value).
    #[arg(short, long, conflicts_with = "demo")]
    pub data: Option<PathBuf>,

    /// Path to configuration file (JSON5).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Restore timeboxes from a previously exported JSON file.
    #[arg(short, long)]
    pub timeboxes: Option<PathBuf>,

    /// Where the Export button writes the committed timeboxes.
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Use a generated dataset instead of a CSV file.
    #[arg(long)]
    pub demo: bool,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}
