//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Concord using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Concord - Clinical Record Harmonization Engine
#[derive(Parser, Debug)]
#[command(name = "concord")]
#[command(version, about, long_about = None)]
#[command(author = "Concord Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "concord.toml", env = "CONCORD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CONCORD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a landed file: parse, map, and submit to the FHIR store
    Ingest(commands::ingest::IngestArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
