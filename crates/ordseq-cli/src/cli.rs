use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "ordseq",
    about = "Merge, group and diff sorted text streams without loading them",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (overrides the config file)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// TOML file with default settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Split records on this delimiter and order them by one field
    #[arg(short, long, global = true)]
    pub delimiter: Option<String>,

    /// 1-based field used as the ordering key (requires --delimiter)
    #[arg(short, long, global = true)]
    pub key_field: Option<usize>,

    /// Fail when an input is not sorted by the key
    #[arg(long, global = true)]
    pub check_order: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge sorted files into one sorted stream
    Merge(MergeArgs),
    /// Show records added, removed and updated between two sorted files
    Diff(DiffArgs),
    /// Show each run of equal keys with its length
    Runs(RunsArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Input files; `-` reads standard input
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct DiffArgs {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Also print pairs whose records are identical
    #[arg(long)]
    pub show_unchanged: bool,
}

#[derive(Args)]
pub struct RunsArgs {
    pub file: PathBuf,
}
