//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::application::services::OutputFormat;

/// Show the ancestry tree of container image layers
#[derive(Parser, Debug)]
#[command(name = "docktree")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, infer_long_args = true)]
pub struct Cli {
    /// Image identifier or tag prefix to show the tree(s) of
    pub image: Option<String>,

    /// Show untagged intermediate layers
    #[arg(short, long)]
    pub intermediate: bool,

    /// Output format [default: ascii]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Keep tagged images below their nearest tagged ancestor when pruning
    /// (not combinable with --intermediate, which prunes nothing)
    #[arg(long)]
    pub splice: bool,

    /// Read layers from a JSON dump of `GET /images/json?all=1` ("-" for stdin)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Config file (overrides the global config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Debug output (repeat for more: -d -d -d)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config path
    Path,
}
