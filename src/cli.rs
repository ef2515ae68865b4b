use clap::{Parser, Subcommand};
use clap_complete::Shell;
use reconcile::ResourceKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rackstate")]
#[command(version)]
#[command(about = "Declarative reconciliation for appliance-managed infrastructure", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Appliance config file (defaults to ~/.config/rackstate/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile declared resources from a plan file or directory
    Apply(ApplyArgs),

    /// Show whether declared resources exist, without changing anything
    Status(StatusArgs),

    /// List the live collection for a resource kind
    List(ListArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Plan file (.toml or .json) or a directory of plan files
    pub plan: PathBuf,

    /// Number of parallel reconciliation jobs
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,

    /// Resolve existence and report what would happen, without mutating
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct StatusArgs {
    /// Plan file (.toml or .json) or a directory of plan files
    pub plan: PathBuf,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Resource kind to list
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// API version (defaults to the kind's standard version)
    #[arg(long)]
    pub api_version: Option<u32>,

    /// Hardware-family variant tag
    #[arg(long)]
    pub variant: Option<String>,
}

fn parse_kind(value: &str) -> Result<ResourceKind, String> {
    ResourceKind::from_name(value).ok_or_else(|| {
        let known: Vec<&str> = ResourceKind::all().iter().map(|k| k.name()).collect();
        format!(
            "unknown resource kind '{value}' (known kinds: {})",
            known.join(", ")
        )
    })
}
