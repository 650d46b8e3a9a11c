use clap::Parser;
use std::path::PathBuf;

use crate::defaults::Defaults;

/// Interactive Yahoo Finance price downloader
#[derive(Parser, Debug)]
#[command(version, about = "Fetch, inspect and export market prices from an interactive menu")]
pub struct Cli {
    /// Directory holding YAML query files
    #[arg(long, default_value = Defaults::INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Directory exported files are written to (created if missing)
    #[arg(long, default_value = Defaults::OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set (logs go to stderr)
    #[arg(long, default_value = Defaults::LOG_FILTER)]
    pub log_filter: String,

    /// Disable coloured menu output
    #[arg(long)]
    pub no_color: bool,
}
