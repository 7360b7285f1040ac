//! The main entry point for the `resub` command-line application.
//!
//! This file is responsible for parsing command-line arguments, merging them
//! with an optional config file, and dispatching into the `resub` library.

use anyhow::Context;
use resub::cli::{self, Args};
use resub::config::{ConfigLoader, OneOrMany, RawConfig};
use resub::output;
use std::process;

#[tokio::main]
async fn main() {
    let args = cli::parse_args();
    if let Err(error) = run_cli(args).await {
        output::print_error(&error);
        process::exit(1);
    }
}

/// Runs one replacement job from the command line.
async fn run_cli(args: Args) -> anyhow::Result<()> {
    if args.config_file.is_none() && args.inputs.len() < 3 {
        anyhow::bail!("resub needs at least 3 arguments: <from> <to> <files>...");
    }

    let mut raw = match &args.config_file {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => RawConfig::default(),
    };

    // Command-line input fills whatever the config document left unset,
    // consumed in order: from, to, then files
    let mut inputs = args.inputs.into_iter();
    if raw.from.is_none() {
        raw.from = inputs.next().map(OneOrMany::One);
    }
    if raw.to.is_none() {
        raw.to = inputs.next().map(OneOrMany::One);
    }
    if raw.files.is_none() {
        // Comma-separated file lists are split here; the shell won't do it
        let files: Vec<String> = inputs
            .flat_map(|arg| arg.split(',').map(str::to_string).collect::<Vec<_>>())
            .collect();
        if !files.is_empty() {
            raw.files = Some(OneOrMany::Many(files));
        }
    }

    if raw.ignore.is_none() && !args.ignore.is_empty() {
        raw.ignore = Some(OneOrMany::Many(args.ignore));
    }
    if raw.encoding.is_none() {
        raw.encoding = args.encoding;
    }
    if raw.disable_globs.is_none() {
        raw.disable_globs = Some(args.disable_globs);
    }
    if raw.is_regex.is_none() {
        raw.is_regex = Some(args.is_regex);
    }
    if raw.allow_empty_paths.is_none() {
        raw.allow_empty_paths = Some(args.allow_empty_paths);
    }
    if raw.count_matches.is_none() {
        raw.count_matches = Some(args.count_matches);
    }
    if raw.dry.is_none() {
        raw.dry = Some(args.dry);
    }
    if raw.verbose.is_none() {
        raw.verbose = Some(args.verbose);
    }
    if raw.quiet.is_none() {
        raw.quiet = Some(args.quiet);
    }

    let from_label = raw.from.as_ref().map(label);
    let to_label = raw.to.as_ref().map(label);

    let config = raw.into_config()?;

    if !config.quiet {
        if let (Some(from), Some(to)) = (from_label, to_label) {
            println!("Replacing '{from}' with '{to}'");
        }
        if config.is_dry_run() {
            println!("Dry run, not making any changes");
        }
    }

    let results = resub::run(&config).await?;

    if args.json {
        output::print_json(&results)?;
    } else if !config.quiet {
        output::print_summary(&results, config.verbose);
    }
    Ok(())
}

fn label(value: &OneOrMany<String>) -> String {
    match value {
        OneOrMany::One(v) => v.clone(),
        OneOrMany::Many(vs) => vs.join(","),
    }
}
