use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot DSM dispatch results", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    /// TOML file with `[labels]` and `[chart]` overrides
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge a solved model's result blocks into one table
    Extract {
        /// Solved-model JSON file
        #[arg(long, value_hint = ValueHint::FilePath)]
        results: PathBuf,
        /// Write the table as CSV instead of printing a summary
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Draw one dispatch chart per window of `--days` days
    Plot {
        /// Solved-model JSON file
        #[arg(long, value_hint = ValueHint::FilePath)]
        results: PathBuf,
        /// Output directory; charts go to its `graphics/` subfolder
        #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
        directory: PathBuf,
        /// Project name used in chart file names
        #[arg(long)]
        project: String,
        /// Window length in days
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Write PNG files instead of rendering in memory
        #[arg(long)]
        save: bool,
    },
    /// Create a folder in the current directory if it is missing
    Mkdir {
        /// Folder name
        name: String,
    },
}
