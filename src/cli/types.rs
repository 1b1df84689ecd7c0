//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::analyze::AnalyzeArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::taxonomy::TaxonomyArgs;

#[derive(Parser, Debug)]
#[command(name = "mender")]
#[command(about = "Mender - CI failure triage and fix proposals", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .mender/
    #[arg(short, long, global = true, env = "MENDER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .mender/config.yaml
    Init(InitArgs),

    /// Triage a failure analysis and write a fix report
    Analyze(AnalyzeArgs),

    /// Show the error taxonomy: priorities, strategies and aliases
    Taxonomy(TaxonomyArgs),
}
