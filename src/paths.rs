use crate::config::Config;
use crate::errors::Result;
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use tokio::task;

/// Expands the configured file patterns into concrete file paths (sync).
///
/// With `disable_globs` the patterns are returned verbatim, without expansion
/// or existence checks. Otherwise each pattern expands in order against the
/// filesystem, directories are dropped, and paths matching any ignore pattern
/// are excluded. A pattern that matches nothing fails the whole resolution
/// unless `allow_empty_paths` is set; expansion stops at the first such
/// pattern.
pub fn resolve_paths_sync(patterns: &[String], config: &Config) -> Result<Vec<PathBuf>> {
    if config.disable_globs {
        return Ok(patterns.iter().map(PathBuf::from).collect());
    }

    let ignore = compile_ignore(&config.ignore)?;
    let options = config.glob.as_match_options();
    let cwd = config.glob.cwd.as_deref();

    let mut paths = Vec::new();
    for pattern in patterns {
        let matched = expand_pattern(pattern, &ignore, options, cwd, config.allow_empty_paths)?;
        paths.extend(matched);
    }
    Ok(paths)
}

/// Expands the configured file patterns into concrete file paths (async).
///
/// All pattern expansions are started together on blocking tasks and awaited
/// jointly; any failing pattern fails the aggregate. Output ordering matches
/// the sync variant for a fixed filesystem snapshot.
pub async fn resolve_paths(patterns: &[String], config: &Config) -> Result<Vec<PathBuf>> {
    if config.disable_globs {
        return Ok(patterns.iter().map(PathBuf::from).collect());
    }

    let ignore = compile_ignore(&config.ignore)?;
    let options = config.glob.as_match_options();

    let handles: Vec<_> = patterns
        .iter()
        .map(|pattern| {
            let pattern = pattern.clone();
            let ignore = ignore.clone();
            let cwd = config.glob.cwd.clone();
            let allow_empty = config.allow_empty_paths;
            task::spawn_blocking(move || {
                expand_pattern(&pattern, &ignore, options, cwd.as_deref(), allow_empty)
            })
        })
        .collect();

    let expanded = futures::future::try_join_all(handles).await?;

    let mut paths = Vec::new();
    for matched in expanded {
        paths.extend(matched?);
    }
    Ok(paths)
}

fn compile_ignore(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).map_err(Into::into))
        .collect()
}

/// Expands one pattern, honoring the ignore list and the empty-match policy.
///
/// When a base directory is configured the pattern is rooted beneath it, so
/// every resolved path naturally carries the prefix.
fn expand_pattern(
    pattern: &str,
    ignore: &[glob::Pattern],
    options: MatchOptions,
    cwd: Option<&Path>,
    allow_empty: bool,
) -> Result<Vec<PathBuf>> {
    let rooted = match cwd {
        Some(base) => base.join(pattern).to_string_lossy().into_owned(),
        None => pattern.to_string(),
    };

    let mut matched = Vec::new();
    for entry in glob::glob_with(&rooted, options)? {
        let path = entry?;
        // Only file entries, never directories
        if !path.is_file() {
            continue;
        }
        if is_ignored(&path, ignore, options, cwd) {
            continue;
        }
        matched.push(path);
    }

    if matched.is_empty() && !allow_empty {
        return Err(crate::errors::Error::NoMatch {
            pattern: pattern.to_string(),
        });
    }
    Ok(matched)
}

/// An ignore pattern excludes a path when it matches the resolved path, the
/// path relative to the base directory, or the bare file name.
fn is_ignored(
    path: &Path,
    ignore: &[glob::Pattern],
    options: MatchOptions,
    cwd: Option<&Path>,
) -> bool {
    if ignore.is_empty() {
        return false;
    }

    let relative = cwd.and_then(|base| path.strip_prefix(base).ok());
    let name = path.file_name().map(Path::new);

    ignore.iter().any(|pattern| {
        pattern.matches_path_with(path, options)
            || relative.is_some_and(|p| pattern.matches_path_with(p, options))
            || name.is_some_and(|n| pattern.matches_path_with(n, options))
    })
}
