use crate::errors::Result;
use crate::replacer::ReplaceResult;
use colored::Colorize;
use std::fmt;

/// Prints the human-readable run summary: how many files changed, and which
/// ones when verbose output is on.
pub fn print_summary(results: &[ReplaceResult], verbose: bool) {
    let changed: Vec<_> = results.iter().filter(|r| r.has_changed).collect();

    if changed.is_empty() {
        println!("{}", "No files were changed".yellow());
        return;
    }

    println!(
        "{}",
        format!("{} file(s) were changed", changed.len()).green()
    );
    if verbose {
        for result in changed {
            match (result.num_matches, result.num_replacements) {
                (Some(matches), Some(replacements)) => println!(
                    "- {} ({matches} matches, {replacements} replacements)",
                    result.file.display()
                ),
                _ => println!("- {}", result.file.display()),
            }
        }
    }
}

/// Emits the results as pretty-printed JSON for scripting consumers.
pub fn print_json(results: &[ReplaceResult]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}

/// Prints a fatal error to stderr.
pub fn print_error(error: &dyn fmt::Display) {
    eprintln!("{} {error}", "Error:".red().bold());
}
