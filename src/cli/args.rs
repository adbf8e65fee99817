//! CLI argument definitions using clap
//!
//! Commands:
//! - docgate init
//! - docgate list
//! - docgate get <id>
//! - docgate add <name>
//! - docgate update <id> <name>
//! - docgate delete <id>
//! - docgate search <term>
//!
//! Every command accepts `--config <path>` and `--data <path>`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docgate - records with sequence-allocated ids over a local document store
#[derive(Parser, Debug)]
#[command(name = "docgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file, overriding `data_file` from the configuration
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Declare the store indexes
    Init,

    /// List every record
    List,

    /// Fetch one record
    Get { id: String },

    /// Create a record with the next id
    Add { name: String },

    /// Rename a record
    Update { id: String, name: String },

    /// Delete a record
    Delete { id: String },

    /// Find records whose name matches a case-insensitive pattern
    Search { term: String },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
