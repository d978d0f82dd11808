//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Haetae - incremental task runner
///
/// Records the environment and results of each command run, so a command
/// only needs to run again when its environment changed.
#[derive(Parser, Debug)]
#[command(name = "haetae")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file path or directory (defaults to searching upward for
    /// haetae.config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file to read and write instead of the configured one
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command's producers and record the result
    Run(RunArgs),

    /// Print a command's current env
    Env(EnvArgs),

    /// Print stored records
    Records(RecordsArgs),

    /// Show version, platform and resolved paths
    Info,

    /// Create a haetae.config.toml template
    Init(InitArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Command name as declared in the config
    pub name: String,
}

/// Arguments for the env command
#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Command name as declared in the config
    pub name: String,
}

/// Arguments for the records command
#[derive(Parser, Debug)]
pub struct RecordsArgs {
    /// Command name (prints the whole store if omitted)
    pub name: Option<String>,

    /// Only the record matching the command's current env
    #[arg(long, requires = "name")]
    pub current: bool,

    /// Print only the fields produced by `run`
    #[arg(short, long)]
    pub data: bool,
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite existing haetae.config.toml
    #[arg(short, long)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Declare a command stub (repeatable; defaults to one named "example")
    #[arg(long = "command", value_name = "NAME")]
    pub commands: Vec<String>,

    /// Store file or directory, relative to the config file
    #[arg(long, value_name = "PATH")]
    pub store_file: Option<String>,
}
