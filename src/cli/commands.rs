//! CLI command definitions

use crate::changes::ChangeSet;
use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;

/// Generate the build pipeline for a set of changed paths
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Tag applied to built base images
    #[arg(short, long)]
    pub tag: String,

    /// Branch whose package index is rebuilt (defaults to the configured branch)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// File listing changed paths, one per line (`-` for stdin)
    #[arg(long)]
    pub changed_files: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Also rebuild base images that depend on changed packages
    #[arg(long)]
    pub include_dependents: bool,

    /// Changed paths
    pub paths: Vec<String>,
}

/// List base images depending on packages
#[derive(Debug, Args, Clone)]
pub struct DependentsCommand {
    /// Package names
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Only consider references qualified with `@<repo>`
    #[arg(long, default_value = "")]
    pub repo: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show the package references declared by every base image
#[derive(Debug, Args, Clone)]
pub struct IndexCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show how changed paths are classified
#[derive(Debug, Args, Clone)]
pub struct ClassifyCommand {
    /// File listing changed paths, one per line (`-` for stdin)
    #[arg(long)]
    pub changed_files: Option<String>,

    /// Changed paths
    pub paths: Vec<String>,
}

/// Pipeline document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Collect changed paths from a list file and the command line
///
/// Repeated paths are dropped.
pub fn read_change_set(changed_files: Option<&str>, paths: &[String]) -> Result<ChangeSet> {
    let mut changes = match changed_files {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read changed paths from stdin")?;
            ChangeSet::from_lines(&text)
        }
        Some(file) => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read changed paths from {}", file))?;
            ChangeSet::from_lines(&text)
        }
        None => ChangeSet::default(),
    };

    changes.extend(paths.iter().cloned());
    Ok(changes.dedup())
}
