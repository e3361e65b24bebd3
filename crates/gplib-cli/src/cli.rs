use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gplib_config::DEFAULT_CONFIG_FILE;
use gplib_types::ValueKind;

#[derive(Parser)]
#[command(
    name = "gplib",
    about = "Inspect and edit self-repairing JSON config files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every key with its inferred kind
    Show(ShowArgs),
    /// Print a single value
    Get(GetArgs),
    /// Assign a value and save the file
    Set(SetArgs),
    /// Create or repair a config file from a defaults file
    Init(InitArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct GetArgs {
    pub file: PathBuf,
    pub key: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Existing config file
    pub file: PathBuf,
    pub key: String,
    pub value: String,
    /// Kind to decode the value as; inferred when omitted
    #[arg(short, long)]
    pub kind: Option<ValueKind>,
}

#[derive(Args)]
pub struct InitArgs {
    pub file: PathBuf,
    /// JSON object of default values in their on-disk string form
    #[arg(short, long)]
    pub defaults: PathBuf,
}
