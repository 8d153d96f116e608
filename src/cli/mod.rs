//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Prefill - KBV e-prescription bundles from inserted health cards
#[derive(Parser, Debug)]
#[command(name = "prefill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "prefill.toml", env = "PREFILL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PREFILL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble a prescription bundle from the inserted cards
    Prefill(commands::prefill::PrefillArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
