//! Command-line interface for chainposts.
//!
//! Validates and replays genesis files and applies message batches against
//! an in-memory store.

pub mod args;
pub mod commands;

use crate::Result;
use std::process;

pub use args::Command;

/// Main entry point for the CLI application
pub fn run() -> Result<()> {
    // Parse command line arguments
    let command = match args::parse_args() {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            args::print_usage();
            process::exit(1);
        }
    };

    // Execute command
    match command {
        Command::Validate { genesis } => commands::validate(&genesis),
        Command::Replay { genesis, export } => commands::replay(&genesis, export.as_deref()),
        Command::Apply {
            genesis,
            messages,
            block_time,
            export,
        } => commands::apply(&genesis, &messages, block_time, export.as_deref()),
        Command::Hashtags { message } => commands::hashtags(&message),
    }
}
