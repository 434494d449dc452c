//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "config-profile",
    about = "Declarative management of macOS configuration profiles",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Catalog file declaring the desired profiles
    #[arg(short, long, global = true, default_value = crate::catalog::DEFAULT_CATALOG)]
    pub catalog: PathBuf,

    /// Directory holding content stamps of installed profiles
    #[arg(long, global = true, default_value = DEFAULT_STATE_DIR)]
    pub state_dir: PathBuf,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

/// Default location of content stamps.
pub const DEFAULT_STATE_DIR: &str = "/var/db/config-profile";

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Converge every profile in the catalog
    Apply,
    /// Re-apply installed profiles after their source changed
    Refresh(RefreshOpts),
    /// Validate the catalog and show inferred dependencies
    Check,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Refresh(_) => "refresh",
            Self::Check => "check",
            Self::Version => "version",
        }
    }
}

/// Options for the `refresh` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RefreshOpts {
    /// Identifiers of the profiles to refresh
    #[arg(required = true)]
    pub identifiers: Vec<String>,
}
