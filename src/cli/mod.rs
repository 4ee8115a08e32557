//! Command-line interface module.

mod adapt;
mod args;

pub use args::{AdaptArgs, Cli, Commands};

use anyhow::Result;

/// Dispatch the parsed CLI to its command implementation.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Adapt { args } => adapt::run(args, &cli.config),
    }
}
