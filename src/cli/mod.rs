//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for dataexport using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// dataexport - scheduled data-service export to SFTP or SharePoint
#[derive(Parser, Debug)]
#[command(name = "dataexport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "dataexport.toml", env = "DATAEXPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DATAEXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the export and upload it to the configured destination
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
