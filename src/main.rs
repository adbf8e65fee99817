//! docgate CLI entry point
//!
//! Parses arguments, dispatches to `cli::run`, reports errors as a JSON
//! error object and exits non-zero on failure. All logic lives in the CLI
//! module.

use docgate::cli;

fn main() {
    if let Err(e) = cli::run() {
        if cli::write_error(e.code_str(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
