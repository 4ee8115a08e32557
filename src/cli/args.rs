//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Stratus deployment adapter CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: stratus.toml)
    #[arg(short = 'C', long, default_value = "stratus.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Adapt a framework build into platform deployment output
    #[command(visible_alias = "a")]
    Adapt {
        #[command(flatten)]
        args: AdaptArgs,
    },
}

/// Adapt command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct AdaptArgs {
    /// Framework build directory (holds routes.json, trace.json, static/)
    #[arg(short, long, default_value = "build", value_hint = clap::ValueHint::DirPath)]
    pub build_dir: PathBuf,

    /// Output directory for the deployment tree
    #[arg(short, long, default_value = ".stratus/output", value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,

    /// Host Node major version used for default-runtime inference
    #[arg(short, long, default_value_t = 20)]
    pub node: u32,
}
