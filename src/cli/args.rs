use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::imaging::ImageTarget;
use crate::tabular::{CleaningStep, TabularTarget};

#[derive(Parser, Debug)]
#[command(name = "datasweeper")]
#[command(version)]
#[command(about = "Convert CSV, Excel and image files with built-in data cleaning", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Your name (login)
    #[arg(long, env = "DATASWEEPER_NAME", global = true)]
    pub name: Option<String>,

    /// Your email address (login)
    #[arg(long, env = "DATASWEEPER_EMAIL", global = true)]
    pub email: Option<String>,

    /// Password (login)
    #[arg(long, env = "DATASWEEPER_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Directory converted files are written to (overrides config)
    #[arg(short, long, global = true)]
    pub out: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init,
    /// Show version information
    Version,
    /// List the navigation sections
    Sections,
    /// About Data Sweeper
    About,
    /// Convert an image to another format
    Image {
        /// Image to convert (png, jpg, jpeg, webp)
        file: PathBuf,

        /// Target format (defaults to the configured one)
        #[arg(long, value_enum)]
        to: Option<ImageTarget>,
    },
    /// Clean, preview and convert CSV / Excel files
    Table {
        /// Files to process (csv, xlsx)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Cleaning step to apply; repeat to chain, applied in the given order
        #[arg(long = "step", value_enum)]
        steps: Vec<CleaningStep>,

        /// Convert each file to this format
        #[arg(long, value_enum)]
        to: Option<TabularTarget>,

        /// Skip the data preview
        #[arg(long)]
        no_preview: bool,

        /// Skip the chart
        #[arg(long)]
        no_chart: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
