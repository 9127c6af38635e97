//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Poya - Holiday lookup service
///
/// Answers whether a date is a holiday and lists a year's holidays from
/// yearly calendar datasets, over HTTP or straight from the terminal.
#[derive(Parser, Debug)]
#[command(name = "poya")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "POYA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the yearly datasets (overrides data.dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve(ServeArgs),

    /// Check whether a date is a holiday
    Check(DateArgs),

    /// Show holiday details for a date
    Info(DateArgs),

    /// List a year's holidays
    List(ListArgs),

    /// Check whether a year has a dataset
    Coverage(CoverageArgs),

    /// Show service status
    Status(StatusArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides server.bind)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// A calendar date given as three parts
#[derive(Parser, Debug)]
pub struct DateArgs {
    /// Year, e.g. 2024
    pub year: i32,

    /// Month (1-12)
    pub month: u32,

    /// Day of month (1-31)
    pub day: u32,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Year to list
    pub year: i32,

    /// Only holidays starting in this month (1-12)
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Only holidays with this category, e.g. poya
    #[arg(short = 't', long = "type")]
    pub category: Option<String>,

    /// Listing projection: simple or full
    #[arg(short, long, default_value = "full")]
    pub format: String,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the coverage command
#[derive(Parser, Debug)]
pub struct CoverageArgs {
    /// Year to check
    pub year: i32,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

/// Output format for query commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}
