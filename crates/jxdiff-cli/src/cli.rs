use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "jxdiff",
    about = "jxdiff: structural diff for JSON and XML-derived documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two documents
    Diff(DiffArgs),
    /// Apply a JSON Patch to a document
    Apply(ApplyArgs),
}

/// What `diff` prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    /// Coloured list of changes with counts
    Summary,
    /// RFC 6902 JSON Patch
    Patch,
    Csv,
    /// Line diff of the pretty-printed inputs
    Unified,
    /// Standalone HTML report
    Html,
    /// Diff tree as JSON
    Tree,
    /// Flat changeset as JSON
    #[value(name = "result")]
    Changes,
}

#[derive(Args)]
pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    /// Match array elements regardless of position
    #[arg(long)]
    pub unordered: bool,
    /// Treat loosely equal primitives such as "1" and 1 as equal
    #[arg(long)]
    pub ignore_type_diff: bool,
    #[arg(long, value_enum, default_value = "summary")]
    pub export: ExportKind,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub left_title: Option<String>,
    #[arg(long)]
    pub right_title: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub document: PathBuf,
    pub patch: PathBuf,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
