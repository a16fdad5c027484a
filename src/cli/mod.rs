//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ClassifyCommand, DependentsCommand, GenerateCommand, IndexCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Generate CI steps for changed Wolfi packages and base images
#[derive(Debug, Parser, Clone)]
#[command(name = "wolfi-ci")]
#[command(author = "wolfi-ci Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Generates dependency-ordered CI steps for Wolfi packages and base images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to generator configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Repository root holding the package and image directories
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate the build pipeline for a set of changed paths
    Generate(GenerateCommand),

    /// List base images depending on packages
    Dependents(DependentsCommand),

    /// Show the package references declared by every base image
    Index(IndexCommand),

    /// Show how changed paths are classified
    Classify(ClassifyCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
