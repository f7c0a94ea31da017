//! tcbuild - build launcher for the TerraCraft C project
//!
//! Picks a compiler and build mode from the command line, finds the
//! `TerraCraft` project root, compiles the game into `bin/` and runs it.
//!
//! ```text
//! tcbuild -release -clang
//! ```

mod build;
mod cli;
mod config;
mod error;
mod exec;
mod utils;

use std::process::ExitCode;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse_launcher();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.display_with_hints();
            ExitCode::FAILURE
        }
    }
}
