use crate::config::{Config, Job, Processor};
use crate::errors::Result;
use crate::fs::{decode, encode};
use crate::patterns::{expand_template, translate_template, MatchView, Query, Rewrite, To};
use futures::future::try_join_all;
use regex::{Captures, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The outcome of processing a single file.
///
/// Counts are carried only when match counting was requested. An occurrence
/// replaced by text equal to itself counts as a match but not as a
/// replacement, so `num_replacements` never exceeds `num_matches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceResult {
    /// The source path processed.
    pub file: PathBuf,
    /// Whether the final contents differ from the original contents.
    pub has_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_matches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_replacements: Option<usize>,
}

/// A query compiled for one specific file.
struct CompiledQuery {
    regex: Regex,
    global: bool,
}

/// Resolves per-file callbacks and compiles the query for matching.
///
/// Literal strings are regex-escaped before compilation and replace the
/// first occurrence only, like non-global patterns.
fn compile_query(query: &Query, file: &Path) -> Result<CompiledQuery> {
    let mut query = query.clone();
    loop {
        match query {
            Query::Literal(text) => {
                return Ok(CompiledQuery {
                    regex: Regex::new(&regex::escape(&text))?,
                    global: false,
                });
            }
            Query::Pattern(pattern) => {
                return Ok(CompiledQuery {
                    regex: pattern.regex().clone(),
                    global: pattern.is_global(),
                });
            }
            Query::PerFile(f) => query = f(file),
        }
    }
}

/// The replacement text one occurrence resolves to.
fn rewrite_text(
    rewrite: &Rewrite,
    caps: &Captures,
    translated: Option<&str>,
    contents: &str,
    file: &Path,
) -> String {
    match rewrite {
        Rewrite::Literal(_) => expand_template(caps, translated.unwrap_or_default()),
        Rewrite::PerMatch(f) => {
            let m = caps.get(0).unwrap();
            let view = MatchView {
                matched: m.as_str(),
                captures: caps
                    .iter()
                    .skip(1)
                    .map(|c| c.map(|c| c.as_str()))
                    .collect(),
                offset: m.start(),
                contents,
                file,
            };
            f(&view)
        }
    }
}

/// Applies the find/replace rules to a contents string. Pure; no I/O.
///
/// Queries apply in order, each against the contents as transformed by its
/// predecessors. The replacement for query `i` comes from `to` (a sequence
/// aligns by index; an index past its end skips that query's substitution).
/// With counting enabled, every occurrence found counts toward `num_matches`
/// (including occurrences of skipped queries), while `num_replacements`
/// only counts occurrences actually substituted with different text.
pub fn make_replacements(
    contents: &str,
    from: &[Query],
    to: &To,
    file: &Path,
    count_matches: bool,
) -> Result<(ReplaceResult, String)> {
    let mut current = contents.to_string();
    let mut num_matches = 0;
    let mut num_replacements = 0;

    for (i, query) in from.iter().enumerate() {
        let compiled = compile_query(query, file)?;
        let rewrite = to.get(i);
        let translated = match rewrite {
            Some(Rewrite::Literal(template)) => Some(translate_template(template)),
            _ => None,
        };

        if count_matches {
            for (occurrence, caps) in compiled.regex.captures_iter(&current).enumerate() {
                num_matches += 1;

                // Only occurrences the substitution will touch can count as
                // replacements: all of them for a global pattern, the first
                // otherwise, none for a skipped query.
                let Some(rewrite) = rewrite else { continue };
                if !compiled.global && occurrence > 0 {
                    continue;
                }
                let matched = caps.get(0).unwrap().as_str();
                let replacement =
                    rewrite_text(rewrite, &caps, translated.as_deref(), &current, file);
                if replacement != matched {
                    num_replacements += 1;
                }
            }
        }

        let Some(rewrite) = rewrite else { continue };

        current = match rewrite {
            Rewrite::Literal(_) => {
                let template = translated.as_deref().unwrap_or_default();
                if compiled.global {
                    compiled.regex.replace_all(&current, template).into_owned()
                } else {
                    compiled.regex.replace(&current, template).into_owned()
                }
            }
            Rewrite::PerMatch(_) => {
                let haystack = current.as_str();
                let replacer = |caps: &Captures| {
                    rewrite_text(rewrite, caps, translated.as_deref(), haystack, file)
                };
                if compiled.global {
                    compiled.regex.replace_all(haystack, replacer).into_owned()
                } else {
                    compiled.regex.replace(haystack, replacer).into_owned()
                }
            }
        };
    }

    let result = ReplaceResult {
        file: file.to_path_buf(),
        has_changed: current != contents,
        num_matches: count_matches.then_some(num_matches),
        num_replacements: count_matches.then_some(num_replacements),
    };
    Ok((result, current))
}

/// Threads contents through an ordered processor chain. Pure; no I/O.
pub(crate) fn run_processors(
    contents: &str,
    processors: &[Processor],
    file: &Path,
) -> (ReplaceResult, String) {
    let new_contents = processors
        .iter()
        .fold(contents.to_string(), |acc, processor| processor(&acc, file));

    let result = ReplaceResult {
        file: file.to_path_buf(),
        has_changed: new_contents != contents,
        num_matches: None,
        num_replacements: None,
    };
    (result, new_contents)
}

/// Replaces in a single file (sync): read, transform, conditionally write.
///
/// The write goes to `get_target_file(source)` (the source itself by
/// default) and only happens when the contents changed and this is not a dry
/// run.
pub fn replace_file_sync(
    source: &Path,
    from: &[Query],
    to: &To,
    config: &Config,
) -> Result<ReplaceResult> {
    let bytes = config.fs_sync.read_file(source)?;
    let contents = decode(&bytes, config.encoding);

    let (result, new_contents) =
        make_replacements(&contents, from, to, source, config.count_matches)?;

    let target = config.target_for(source);
    if result.has_changed && !config.dry {
        config
            .fs_sync
            .write_file(&target, &encode(&new_contents, config.encoding))?;
    }
    Ok(result)
}

/// Replaces in a single file (async).
pub async fn replace_file(
    source: &Path,
    from: &[Query],
    to: &To,
    config: &Config,
) -> Result<ReplaceResult> {
    let bytes = config.fs.read_file(source).await?;
    let contents = decode(&bytes, config.encoding);

    let (result, new_contents) =
        make_replacements(&contents, from, to, source, config.count_matches)?;

    let target = config.target_for(source);
    if result.has_changed && !config.dry {
        config
            .fs
            .write_file(&target, &encode(&new_contents, config.encoding))
            .await?;
    }
    Ok(result)
}

/// Runs the processor chain against a single file (sync). Processor mode has
/// no match counting and always writes back to the source path.
pub fn process_file_sync(
    file: &Path,
    processors: &[Processor],
    config: &Config,
) -> Result<ReplaceResult> {
    let bytes = config.fs_sync.read_file(file)?;
    let contents = decode(&bytes, config.encoding);

    let (result, new_contents) = run_processors(&contents, processors, file);

    if result.has_changed && !config.dry {
        config
            .fs_sync
            .write_file(file, &encode(&new_contents, config.encoding))?;
    }
    Ok(result)
}

/// Runs the processor chain against a single file (async).
pub async fn process_file(
    file: &Path,
    processors: &[Processor],
    config: &Config,
) -> Result<ReplaceResult> {
    let bytes = config.fs.read_file(file).await?;
    let contents = decode(&bytes, config.encoding);

    let (result, new_contents) = run_processors(&contents, processors, file);

    if result.has_changed && !config.dry {
        config
            .fs
            .write_file(file, &encode(&new_contents, config.encoding))
            .await?;
    }
    Ok(result)
}

/// Runs a configuration to completion (sync).
///
/// Paths resolve in pattern order and every file is processed strictly in
/// sequence; the first error aborts the run. Results correspond to resolved
/// paths in order.
pub fn run_sync(config: &Config) -> Result<Vec<ReplaceResult>> {
    let paths = crate::paths::resolve_paths_sync(&config.files, config)?;
    match &config.job {
        Job::Replace { from, to } => paths
            .iter()
            .map(|path| replace_file_sync(path, from, to, config))
            .collect(),
        Job::Process { processors } => paths
            .iter()
            .map(|path| process_file_sync(path, processors, config))
            .collect(),
    }
}

/// Runs a configuration to completion (async).
///
/// Every file's read-transform-write pipeline starts concurrently and is
/// awaited jointly; there is no concurrency limit, which is fine for a
/// short-lived batch tool but is a known scalability ceiling for very large
/// file sets. The first failure fails the aggregate; files whose writes
/// already completed are not rolled back. Result order matches resolved path
/// order regardless of completion order.
pub async fn run(config: &Config) -> Result<Vec<ReplaceResult>> {
    let paths = crate::paths::resolve_paths(&config.files, config).await?;
    match &config.job {
        Job::Replace { from, to } => {
            try_join_all(
                paths
                    .iter()
                    .map(|path| replace_file(path, from, to, config)),
            )
            .await
        }
        Job::Process { processors } => {
            try_join_all(
                paths
                    .iter()
                    .map(|path| process_file(path, processors, config)),
            )
            .await
        }
    }
}

/// Runs several configurations (sync), concatenating their results in input
/// order.
pub fn run_many_sync(configs: &[Config]) -> Result<Vec<ReplaceResult>> {
    let mut results = Vec::new();
    for config in configs {
        results.extend(run_sync(config)?);
    }
    Ok(results)
}

/// Runs several configurations (async). All configurations start together;
/// a failure in any one of them fails the whole batch.
pub async fn run_many(configs: &[Config]) -> Result<Vec<ReplaceResult>> {
    let batches = try_join_all(configs.iter().map(|config| run(config))).await?;
    Ok(batches.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobOptions;
    use crate::patterns::Pattern;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn replace(contents: &str, from: Vec<Query>, to: To) -> (ReplaceResult, String) {
        make_replacements(contents, &from, &to, Path::new("test.txt"), false).unwrap()
    }

    fn replace_counting(contents: &str, from: Vec<Query>, to: To) -> (ReplaceResult, String) {
        make_replacements(contents, &from, &to, Path::new("test.txt"), true).unwrap()
    }

    #[test]
    fn test_global_pattern_replacement() {
        let from = vec![Query::Pattern(Pattern::with_flags(r"re\splace", "g").unwrap())];
        let (result, contents) = replace("a re place c", from, To::from("b"));
        assert_eq!(contents, "a b c");
        assert!(result.has_changed);
    }

    #[test]
    fn test_no_match_leaves_contents_untouched() {
        let (result, contents) = replace("a re place c", vec![Query::from("nope")], To::from("b"));
        assert_eq!(contents, "a re place c");
        assert!(!result.has_changed);
    }

    #[test]
    fn test_multiple_queries_share_scalar_replacement() {
        let from = vec![
            Query::Pattern(Pattern::with_flags("re", "g").unwrap()),
            Query::Pattern(Pattern::with_flags("place", "g").unwrap()),
        ];
        let (result, contents) = replace("a re place c", from, To::from("b"));
        assert_eq!(contents, "a b b c");
        assert!(result.has_changed);
    }

    #[test]
    fn test_shorter_replacement_array_skips_queries_but_counts_them() {
        let from = vec![
            Query::Pattern(Pattern::with_flags("re", "g").unwrap()),
            Query::Pattern(Pattern::with_flags("place", "g").unwrap()),
        ];
        let to = To::Many(vec![Rewrite::from("b")]);
        let (result, contents) = replace_counting("a re place c", from, to);

        // The second query has no replacement: it still matches, so it
        // contributes to num_matches, but nothing is substituted for it.
        assert_eq!(contents, "a b place c");
        assert_eq!(result.num_matches, Some(2));
        assert_eq!(result.num_replacements, Some(1));
        assert!(result.has_changed);
    }

    #[test]
    fn test_array_alignment_leaves_unpaired_query_untouched() {
        let from = vec![Query::from("A"), Query::from("B")];
        let to = To::Many(vec![Rewrite::from("X")]);
        let (_, contents) = replace("A and B", from, to);
        assert_eq!(contents, "X and B");
    }

    #[test]
    fn test_literal_from_is_not_a_pattern() {
        // Metacharacters in a literal query must not act as regex syntax
        let (result, contents) = replace("abc a.c", vec![Query::from("a.c")], To::from("x"));
        assert_eq!(contents, "abc x");
        assert!(result.has_changed);
    }

    #[test]
    fn test_literal_replaces_first_occurrence_only() {
        let (_, contents) = replace("one one one", vec![Query::from("one")], To::from("two"));
        assert_eq!(contents, "two one one");
    }

    #[test]
    fn test_non_global_pattern_replaces_first_occurrence_only() {
        let from = vec![Query::Pattern(Pattern::new("one").unwrap())];
        let (_, contents) = replace("one one one", from, To::from("two"));
        assert_eq!(contents, "two one one");
    }

    #[test]
    fn test_round_trip_restores_original() {
        let original = "the quick brown fox";
        let (_, swapped) = replace(original, vec![Query::from("quick")], To::from("slow"));
        let (result, restored) = replace(&swapped, vec![Query::from("slow")], To::from("quick"));
        assert_eq!(restored, original);
        assert!(result.has_changed);
    }

    #[test]
    fn test_count_invariant_holds() {
        let from = vec![Query::Pattern(Pattern::with_flags("o", "g").unwrap())];
        let (result, _) = replace_counting("foo bar o", from, To::from("0"));
        let matches = result.num_matches.unwrap();
        let replacements = result.num_replacements.unwrap();
        assert!(replacements <= matches);
        assert_eq!(matches, 3);
        assert_eq!(replacements, 3);
    }

    #[test]
    fn test_self_replacement_is_not_a_replacement() {
        let (result, contents) = replace_counting("echo echo", vec![Query::from("echo")], To::from("echo"));
        assert_eq!(result.num_matches, Some(2));
        assert_eq!(result.num_replacements, Some(0));
        assert!(!result.has_changed);
        assert_eq!(contents, "echo echo");
    }

    #[test]
    fn test_zero_matches_means_no_change() {
        let (result, _) = replace_counting("nothing here", vec![Query::from("absent")], To::from("x"));
        assert_eq!(result.num_matches, Some(0));
        assert_eq!(result.num_replacements, Some(0));
        assert!(!result.has_changed);
    }

    #[test]
    fn test_backreference_templates() {
        let from = vec![Query::Pattern(Pattern::with_flags(r"(\w+)-(\w+)", "g").unwrap())];
        let (_, contents) = replace("left-right up-down", from, To::from("$2_$1"));
        assert_eq!(contents, "right_left down_up");
    }

    #[test]
    fn test_full_match_backreference() {
        let from = vec![Query::Pattern(Pattern::with_flags("y", "g").unwrap())];
        let (_, contents) = replace("xyz", from, To::from("($&)"));
        assert_eq!(contents, "x(y)z");
    }

    #[test]
    fn test_per_file_query() {
        let from = vec![Query::per_file(|file: &Path| {
            Query::Literal(file.file_name().unwrap().to_string_lossy().into_owned())
        })];
        let (result, contents) = make_replacements(
            "name is test.txt here",
            &from,
            &To::from("redacted"),
            Path::new("test.txt"),
            false,
        )
        .unwrap();
        assert_eq!(contents, "name is redacted here");
        assert!(result.has_changed);
    }

    #[test]
    fn test_per_match_rewrite_sees_match_context() {
        let from = vec![Query::Pattern(Pattern::with_flags(r"\d+", "g").unwrap())];
        let to = To::One(Rewrite::per_match(|view: &MatchView| {
            format!("{}@{}", view.matched, view.offset)
        }));
        let (_, contents) = replace("7 and 42", from, to);
        assert_eq!(contents, "7@0 and 42@6");
    }

    #[test]
    fn test_per_match_rewrite_sees_file_and_captures() {
        let from = vec![Query::Pattern(Pattern::with_flags(r"v(\d)", "g").unwrap())];
        let to = To::One(Rewrite::per_match(|view: &MatchView| {
            let group = view.captures[0].unwrap();
            format!("{}+{}", view.file.display(), group)
        }));
        let (_, contents) = make_replacements("v1", &from, &to, Path::new("f.txt"), false).unwrap();
        assert_eq!(contents, "f.txt+1");
    }

    #[test]
    fn test_queries_apply_to_progressively_transformed_contents() {
        // The second query matches text produced by the first
        let from = vec![Query::from("aa"), Query::from("bb")];
        let to = To::Many(vec![Rewrite::from("bb"), Rewrite::from("cc")]);
        let (_, contents) = replace("aa", from, to);
        assert_eq!(contents, "cc");
    }

    #[test]
    fn test_processor_chain_runs_in_order() {
        let processors: Vec<Processor> = vec![
            Arc::new(|contents: &str, _: &Path| contents.replace("a", "b")),
            Arc::new(|contents: &str, _: &Path| contents.replace("b", "c")),
        ];
        let (result, contents) = run_processors("a", &processors, Path::new("x"));
        assert_eq!(contents, "c");
        assert!(result.has_changed);
        assert_eq!(result.num_matches, None);
    }

    // Driver and orchestrator tests

    fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_run_sync_rewrites_files() {
        let temp_dir = TempDir::new().unwrap();
        write_fixture(&temp_dir, "one.txt", "a re place c");
        write_fixture(&temp_dir, "two.txt", "untouched");

        let config = Config::builder()
            .file(format!("{}/*.txt", temp_dir.path().display()))
            .from(Pattern::with_flags(r"re\splace", "g").unwrap())
            .to("b")
            .build()
            .unwrap();

        let results = run_sync(&config).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].has_changed);
        assert!(!results[1].has_changed);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("one.txt")).unwrap(),
            "a b c"
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("two.txt")).unwrap(),
            "untouched"
        );
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_fixture(&temp_dir, "file.txt", "hello world");

        let config = Config::builder()
            .file(path.display().to_string())
            .from("world")
            .to("there")
            .dry(true)
            .build()
            .unwrap();

        let results = run_sync(&config).unwrap();
        assert!(results[0].has_changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn test_target_file_leaves_source_alone() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_fixture(&temp_dir, "source.txt", "old text");
        let target = temp_dir.path().join("copy.txt");

        let config = Config::builder()
            .file(source.display().to_string())
            .from("old")
            .to("new")
            .target_file(|source: &Path| source.with_file_name("copy.txt"))
            .build()
            .unwrap();

        run_sync(&config).unwrap();
        assert_eq!(fs::read_to_string(&source).unwrap(), "old text");
        assert_eq!(fs::read_to_string(&target).unwrap(), "new text");
    }

    #[test]
    fn test_processor_mode_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_fixture(&temp_dir, "file.txt", "shout");

        let config = Config::builder()
            .file(path.display().to_string())
            .processor(|contents, _| contents.to_uppercase())
            .build()
            .unwrap();

        let results = run_sync(&config).unwrap();
        assert!(results[0].has_changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "SHOUT");
    }

    #[test]
    fn test_count_matches_carried_through_driver() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_fixture(&temp_dir, "file.txt", "x x x");

        let config = Config::builder()
            .file(path.display().to_string())
            .from(Pattern::with_flags("x", "g").unwrap())
            .to("y")
            .count_matches(true)
            .build()
            .unwrap();

        let results = run_sync(&config).unwrap();
        assert_eq!(results[0].num_matches, Some(3));
        assert_eq!(results[0].num_replacements, Some(3));
    }

    #[tokio::test]
    async fn test_async_run_matches_sync_results() {
        let temp_dir = TempDir::new().unwrap();
        write_fixture(&temp_dir, "a.txt", "a re place c");
        write_fixture(&temp_dir, "b.txt", "a re place c");

        let build = |dry: bool| {
            Config::builder()
                .file(format!("{}/*.txt", temp_dir.path().display()))
                .from(Pattern::with_flags(r"re\splace", "g").unwrap())
                .to("b")
                .dry(dry)
                .build()
                .unwrap()
        };

        // Dry-run both modes first so each sees identical inputs
        let sync_results = run_sync(&build(true)).unwrap();
        let async_results = run(&build(true)).await.unwrap();
        assert_eq!(sync_results, async_results);

        let results = run(&build(false)).await.unwrap();
        assert!(results.iter().all(|r| r.has_changed));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("a.txt")).unwrap(),
            "a b c"
        );
    }

    #[tokio::test]
    async fn test_async_dry_run_never_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_fixture(&temp_dir, "file.txt", "hello world");

        let config = Config::builder()
            .file(path.display().to_string())
            .from("world")
            .to("there")
            .dry(true)
            .build()
            .unwrap();

        let results = run(&config).await.unwrap();
        assert!(results[0].has_changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[tokio::test]
    async fn test_run_many_concatenates_in_input_order() {
        let temp_dir = TempDir::new().unwrap();
        let first = write_fixture(&temp_dir, "first.txt", "alpha");
        let second = write_fixture(&temp_dir, "second.txt", "beta");

        let configs = vec![
            Config::builder()
                .file(first.display().to_string())
                .from("alpha")
                .to("ALPHA")
                .build()
                .unwrap(),
            Config::builder()
                .file(second.display().to_string())
                .from("beta")
                .to("BETA")
                .build()
                .unwrap(),
        ];

        let results = run_many(&configs).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].file.ends_with("first.txt"));
        assert!(results[1].file.ends_with("second.txt"));

        let sync_results = run_many_sync(&configs).unwrap();
        assert_eq!(sync_results.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_fails_aggregate() {
        let temp_dir = TempDir::new().unwrap();
        let present = write_fixture(&temp_dir, "present.txt", "data");
        let missing = temp_dir.path().join("missing.txt");

        let config = Config::builder()
            .files([present.display().to_string(), missing.display().to_string()])
            .disable_globs(true)
            .from("data")
            .to("info")
            .build()
            .unwrap();

        assert!(run(&config).await.is_err());
    }

    #[test]
    fn test_swappable_filesystem_capability() {
        use crate::fs::SyncFileIo;
        use std::collections::HashMap;
        use std::io;
        use std::sync::Mutex;

        struct MemIo(Mutex<HashMap<PathBuf, Vec<u8>>>);

        impl SyncFileIo for MemIo {
            fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
                self.0
                    .lock()
                    .unwrap()
                    .get(path)
                    .cloned()
                    .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
            }

            fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
                self.0
                    .lock()
                    .unwrap()
                    .insert(path.to_path_buf(), contents.to_vec());
                Ok(())
            }
        }

        let mem = Arc::new(MemIo(Mutex::new(HashMap::from([(
            PathBuf::from("mem.txt"),
            b"old data".to_vec(),
        )]))));

        let config = Config::builder()
            .file("mem.txt")
            .disable_globs(true)
            .from("old")
            .to("new")
            .fs_sync(mem.clone())
            .build()
            .unwrap();

        let results = run_sync(&config).unwrap();
        assert!(results[0].has_changed);
        assert_eq!(
            mem.0.lock().unwrap().get(Path::new("mem.txt")).unwrap(),
            b"new data"
        );
    }

    #[test]
    fn test_encoding_carried_through_driver() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin.txt");
        // "café" in windows-1252
        fs::write(&path, [0x63, 0x61, 0x66, 0xE9]).unwrap();

        let config = Config::builder()
            .file(path.display().to_string())
            .from("café")
            .to("coffee")
            .encoding("latin1")
            .build()
            .unwrap();

        let results = run_sync(&config).unwrap();
        assert!(results[0].has_changed);
        assert_eq!(fs::read(&path).unwrap(), b"coffee");
    }

    #[test]
    fn test_cwd_results_prefixed_in_run() {
        let temp_dir = TempDir::new().unwrap();
        write_fixture(&temp_dir, "file.txt", "old");

        let config = Config::builder()
            .file("*.txt")
            .glob(GlobOptions {
                cwd: Some(temp_dir.path().to_path_buf()),
                ..GlobOptions::default()
            })
            .from("old")
            .to("new")
            .build()
            .unwrap();

        let results = run_sync(&config).unwrap();
        assert!(results[0].file.starts_with(temp_dir.path()));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("file.txt")).unwrap(),
            "new"
        );
    }
}
