use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ofstest",
    version,
    about = "Conformance harness for distributed file systems: declarative test modules run over SSH against a mounted cluster"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run registered test modules against a cluster
    Run(RunArgs),
    /// List registered modules and their entries
    List(ListArgs),
    /// Validate a cluster config and the module registry
    Validate(ValidateArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = "cluster.yaml")]
    pub config: PathBuf,

    /// Only run the module with this prefix
    #[arg(long)]
    pub module: Option<String>,

    /// Write a machine-readable summary to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Per-entry wall-clock limit in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Run every entry on the local machine instead of over SSH
    #[arg(long, default_value = "false")]
    pub local: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, default_value = "cluster.yaml")]
    pub config: PathBuf,
}
