use clap::Parser;
use std::path::PathBuf;

/// Batch find-and-replace across files.
///
/// `resub` expands glob patterns into file lists, applies one or more
/// find/replace rules to each file's contents, and reports which files
/// changed. It is meant for build scripts and one-shot maintenance jobs.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Batch find-and-replace across files",
    long_about = "resub - batch find-and-replace across files.

Reads each matched file, applies the replacement rules, and writes the
result back in place. Pass --dry to preview which files would change.

QUICK EXAMPLES:
  resub foo bar 'src/**/*.rs'             # Replace first 'foo' per file
  resub --is-regex 'fo+' bar '**/*.txt'   # Regex replacement, all occurrences
  resub '/colou?r/gi' color '**/*.md'     # Delimited pattern with flags
  resub --config-file job.json            # Everything from a config file
  resub --dry old new 'docs/*.md'         # Preview only"
)]
pub struct Args {
    /// Positional input: <from> <to> <files>... Each one may instead come
    /// from the config file, in which case it is not expected here.
    pub inputs: Vec<String>,

    /// Path to a JSON or YAML config file
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Glob patterns of files to exclude (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// File encoding (default is utf-8)
    #[arg(long)]
    pub encoding: Option<String>,

    /// Treat file arguments as literal paths, without glob expansion
    #[arg(long)]
    pub disable_globs: bool,

    /// Treat <from> as a regex pattern replacing all occurrences
    #[arg(long)]
    pub is_regex: bool,

    /// Let patterns that match no files contribute nothing instead of failing
    #[arg(long)]
    pub allow_empty_paths: bool,

    /// Report match and replacement counts per file
    #[arg(long)]
    pub count_matches: bool,

    /// Dry run (no changes made)
    #[arg(long)]
    pub dry: bool,

    /// Emit results as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Show additional information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
