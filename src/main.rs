//! peanuts CLI entry point
//!
//! All logic is delegated to the CLI module. The response (including any
//! error) has already been printed to stdout; this only sets the exit code.

use peanuts::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
