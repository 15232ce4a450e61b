//! CLI argument definitions for the dbGaP data-dictionary indexer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dbgap-index",
    version,
    about = "Index dbGaP XML data dictionaries across object-store repositories",
    long_about = "Recursively discover dbGaP-formatted XML data dictionaries in a set of\n\
                  object-store repositories, index them by study identifier, and report\n\
                  same-repository duplicates or cross-repository coverage."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Report study IDs declared by more than one file in one repository.
    ///
    /// Prints a JSON object mapping each duplicated study ID to the
    /// sorted offending file paths. The exit code equals the number of
    /// duplicated study IDs, so a clean run exits 0.
    Duplicates(RepoArgs),

    /// Write the cross-repository coverage matrix as CSV.
    Coverage(CoverageArgs),

    /// Dump the full study index as JSON.
    Index(IndexArgs),
}

#[derive(Parser)]
pub struct RepoArgs {
    /// Repository to index, as NAME or NAME:BRANCH. Repeatable.
    #[arg(short = 'r', long = "repository", value_name = "REPO[:BRANCH]")]
    pub repositories: Vec<String>,

    /// File of newline-delimited repository references ('#' comments allowed).
    #[arg(long = "repository-list", value_name = "FILE")]
    pub repository_list: Option<PathBuf>,

    /// Read repositories from a local directory tree instead of lakeFS.
    ///
    /// The directory must mirror the store layout: one subdirectory per
    /// repository, one per branch below it.
    #[arg(long = "local-root", value_name = "DIR")]
    pub local_root: Option<PathBuf>,
}

#[derive(Parser)]
pub struct CoverageArgs {
    #[command(flatten)]
    pub repos: RepoArgs,

    /// Output path for the CSV matrix ('-' = stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH", default_value = "-")]
    pub output: String,
}

#[derive(Parser)]
pub struct IndexArgs {
    #[command(flatten)]
    pub repos: RepoArgs,

    /// Output path for the JSON index ('-' = stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH", default_value = "-")]
    pub output: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
