//! Command-line argument parsing for chainposts.

use crate::error::{PostsError, Result};
use std::env;
use std::path::PathBuf;
use std::process;

/// Command-line interface commands
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Validate {
        genesis: PathBuf,
    },
    Replay {
        genesis: PathBuf,
        export: Option<PathBuf>,
    },
    Apply {
        genesis: PathBuf,
        messages: PathBuf,
        block_time: u64,
        export: Option<PathBuf>,
    },
    Hashtags {
        message: String,
    },
}

/// Parse command line arguments into a Command
pub fn parse_args() -> Result<Command> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    parse_from(&args[1..])
}

/// Parses `args` (without the program name).
pub fn parse_from(args: &[String]) -> Result<Command> {
    let Some(command) = args.first() else {
        return Err(PostsError::config("missing command"));
    };

    match command.as_str() {
        "validate" => {
            let genesis = args
                .get(1)
                .ok_or_else(|| PostsError::config("validate requires a genesis file"))?;
            Ok(Command::Validate {
                genesis: PathBuf::from(genesis),
            })
        }

        "replay" => {
            let genesis = args
                .get(1)
                .ok_or_else(|| PostsError::config("replay requires a genesis file"))?;
            Ok(Command::Replay {
                genesis: PathBuf::from(genesis),
                export: export_flag(&args[2..])?,
            })
        }

        "apply" => {
            if args.len() < 4 {
                return Err(PostsError::config(
                    "apply requires a genesis file, a messages file and a block time",
                ));
            }
            let block_time = args[3].parse().map_err(|_| {
                PostsError::config(format!("invalid block time '{}'", args[3]))
            })?;
            Ok(Command::Apply {
                genesis: PathBuf::from(&args[1]),
                messages: PathBuf::from(&args[2]),
                block_time,
                export: export_flag(&args[4..])?,
            })
        }

        "hashtags" => {
            if args.len() < 2 {
                return Err(PostsError::config("hashtags requires a message"));
            }
            Ok(Command::Hashtags {
                message: args[1..].join(" "),
            })
        }

        other => Err(PostsError::config(format!("unknown command '{}'", other))),
    }
}

/// Reads an optional trailing `--export <file>`.
fn export_flag(rest: &[String]) -> Result<Option<PathBuf>> {
    match rest {
        [] => Ok(None),
        [flag, path] if flag == "--export" => Ok(Some(PathBuf::from(path))),
        _ => Err(PostsError::config(format!(
            "unexpected arguments: {}",
            rest.join(" ")
        ))),
    }
}

/// Print usage information
pub fn print_usage() {
    println!("chainposts - post validation and genesis replay");
    println!("===============================================");
    println!();
    println!("Usage: chainposts <command> [args...]");
    println!();
    println!("Commands:");
    println!("  validate <genesis.json>                                 Validate a genesis file");
    println!("  replay <genesis.json> [--export <out.json>]             Import genesis and export state");
    println!("  apply <genesis.json> <msgs.json> <block_time> [--export <out.json>]");
    println!("                                                          Apply messages on top of genesis");
    println!("  hashtags <message...>                                   Print the hashtags of a message");
    println!();
    println!("Environment:");
    println!("  CHAINPOSTS_MAX_MESSAGE_LENGTH              default 500");
    println!("  CHAINPOSTS_MAX_OPTIONAL_DATA_FIELDS        default 10");
    println!("  CHAINPOSTS_MAX_OPTIONAL_DATA_VALUE_LENGTH  default 200");
}
