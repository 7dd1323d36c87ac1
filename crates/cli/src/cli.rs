//! Argument grammar for `rcr`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rcr", version, about = "A safe command runner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute one or all groups declared in a config file
    Run(RunArgs),
    /// Resolve and check a config without executing anything
    Validate(ValidateArgs),
    /// Print the groups and commands a config declares
    List(ListArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to the TOML config file
    pub config: PathBuf,

    /// Run only this group instead of every group in the config
    #[arg(long)]
    pub group: Option<String>,

    /// Allocate a virtual scratch path instead of a real directory
    #[arg(long)]
    pub dry_run: bool,

    /// Skip removing each group's scratch directory on exit
    #[arg(long)]
    pub keep_scratch: bool,

    /// Directory of `*.sha256` manifests for binary verification
    #[arg(long)]
    pub manifest_dir: Option<PathBuf>,

    /// Webhook URL to notify with each group's result; omit for no-op
    #[arg(long)]
    pub webhook: Option<String>,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the TOML config file
    pub config: PathBuf,

    /// Check only this group instead of every group in the config
    #[arg(long)]
    pub group: Option<String>,

    /// Directory of `*.sha256` manifests for binary verification
    #[arg(long)]
    pub manifest_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the TOML config file
    pub config: PathBuf,
}
