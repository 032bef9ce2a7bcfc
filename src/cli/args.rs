//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Rename static assets by content hash and rewrite every reference to them
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Directory with the assets to revision
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Directory to write revisioned assets to
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,

    /// Config file path (default: revmark.toml, searched upward from cwd)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Number of hash characters in file names
    #[arg(long, value_name = "N")]
    pub hash_length: Option<usize>,

    /// URL prefix for rewritten references (e.g. https://cdn.example.com/)
    #[arg(long, value_name = "URL")]
    pub prefix: Option<String>,

    /// Keep files ending with SUFFIX under their original name (repeatable)
    #[arg(long, value_name = "SUFFIX")]
    pub ignore: Vec<String>,

    /// Keep files whose root-relative path matches REGEX (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub ignore_regex: Vec<String>,

    /// Write the original → revisioned manifest
    #[arg(short, long)]
    pub manifest: bool,

    /// Show what would be renamed without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print per-file progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

impl Cli {
    /// Whether any ignore rule was given on the command line.
    pub fn has_ignore_rules(&self) -> bool {
        !self.ignore.is_empty() || !self.ignore_regex.is_empty()
    }
}
