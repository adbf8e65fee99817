//! CLI module for docgate
//!
//! Thin client over [`RecordGateway`](crate::gateway::RecordGateway): one
//! command, one gateway operation, one JSON line on stdout. Notifications go
//! to stderr.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, load_config, open_gateway, run, run_command, DEFAULT_DATA_FILE};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_json, write_response};
