//! Derive CLI
//!
//! Drives the demo operator libraries from the command line with a script of
//! choices and responses, on either evaluator.

use derivation_core::cli;

fn main() {
    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
