//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tabula using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Tabula - Spreadsheet Import/Export Job Processor
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(version, about, long_about = None)]
#[command(author = "Tabula Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tabula.toml", env = "TABULA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TABULA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage a spreadsheet, create an import job and process it
    Import(commands::import::ImportArgs),

    /// Build an export artifact from a JSON rows file
    Export(commands::export::ExportArgs),

    /// Show the state of a job record
    Status(commands::status::StatusArgs),

    /// Cancel an import job and discard its temporary artifacts
    Cancel(commands::cancel::CancelArgs),

    /// Re-run a failed or interrupted import job
    Resume(commands::resume::ResumeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
