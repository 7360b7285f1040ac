use crate::errors::Result;
use crate::fs::{AsyncFileIo, DiskIo, SyncFileIo};
use crate::patterns::{parse_delimited, Pattern, Query, Rewrite, To};
use encoding_rs::{Encoding, UTF_8};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A content transform applied in processor mode: `(contents, file)` in, new
/// contents out.
pub type Processor = Arc<dyn Fn(&str, &Path) -> String + Send + Sync>;

/// Maps a source path to the path the rewritten contents are written to.
pub type TargetFn = Arc<dyn Fn(&Path) -> PathBuf + Send + Sync>;

/// Options forwarded to glob expansion.
#[derive(Clone)]
pub struct GlobOptions {
    /// Base directory for expansion. Patterns are expanded beneath it and
    /// every resolved path comes back prefixed with it.
    pub cwd: Option<PathBuf>,
    pub case_sensitive: bool,
    pub require_literal_separator: bool,
    pub require_literal_leading_dot: bool,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        }
    }
}

impl GlobOptions {
    pub(crate) fn as_match_options(&self) -> glob::MatchOptions {
        glob::MatchOptions {
            case_sensitive: self.case_sensitive,
            require_literal_separator: self.require_literal_separator,
            require_literal_leading_dot: self.require_literal_leading_dot,
        }
    }
}

/// The work a configuration describes: declarative find/replace rules, or a
/// chain of custom processors. The two are mutually exclusive.
#[derive(Clone)]
pub(crate) enum Job {
    Replace { from: Vec<Query>, to: To },
    Process { processors: Vec<Processor> },
}

/// A fully populated, immutable execution plan.
///
/// Built through [`ConfigBuilder`]; every optional knob has its documented
/// default filled in by the time a `Config` exists, so downstream code never
/// deals with absent values.
#[derive(Clone)]
pub struct Config {
    pub(crate) files: Vec<String>,
    pub(crate) ignore: Vec<String>,
    pub(crate) job: Job,
    pub(crate) encoding: &'static Encoding,
    pub(crate) disable_globs: bool,
    pub(crate) allow_empty_paths: bool,
    pub(crate) count_matches: bool,
    pub(crate) dry: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub(crate) get_target_file: Option<TargetFn>,
    pub(crate) glob: GlobOptions,
    pub(crate) fs: Arc<dyn AsyncFileIo>,
    pub(crate) fs_sync: Arc<dyn SyncFileIo>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("files", &self.files)
            .field("ignore", &self.ignore)
            .field("encoding", &self.encoding.name())
            .field("disable_globs", &self.disable_globs)
            .field("allow_empty_paths", &self.allow_empty_paths)
            .field("count_matches", &self.count_matches)
            .field("dry", &self.dry)
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Starts building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The target path for a source file (identity unless overridden).
    pub(crate) fn target_for(&self, source: &Path) -> PathBuf {
        match &self.get_target_file {
            Some(f) => f(source),
            None => source.to_path_buf(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry
    }
}

/// Builder for [`Config`].
///
/// Collects user-supplied settings, validates them, and produces an immutable
/// plan. Scalar convenience is built in: `file` and `from` may be called once
/// or repeatedly, single values and sequences both normalize to ordered
/// lists. The caller's inputs are consumed, never mutated in place.
#[derive(Default)]
pub struct ConfigBuilder {
    files: Vec<String>,
    ignore: Vec<String>,
    from: Vec<Query>,
    to: Option<To>,
    processors: Vec<Processor>,
    encoding: Option<String>,
    disable_globs: bool,
    allow_empty_paths: bool,
    count_matches: bool,
    dry: bool,
    verbose: bool,
    quiet: bool,
    get_target_file: Option<TargetFn>,
    glob: Option<GlobOptions>,
    fs: Option<Arc<dyn AsyncFileIo>>,
    fs_sync: Option<Arc<dyn SyncFileIo>>,
}

impl ConfigBuilder {
    /// Adds a single path or glob pattern.
    pub fn file(mut self, pattern: impl Into<String>) -> Self {
        self.files.push(pattern.into());
        self
    }

    /// Adds several path or glob patterns.
    pub fn files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds a glob pattern whose matches are excluded from expansion.
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    pub fn ignore_all<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds a match query (literal, pattern or per-file callback).
    pub fn from(mut self, query: impl Into<Query>) -> Self {
        self.from.push(query.into());
        self
    }

    pub fn from_all<I, Q>(mut self, queries: I) -> Self
    where
        I: IntoIterator<Item = Q>,
        Q: Into<Query>,
    {
        self.from.extend(queries.into_iter().map(Into::into));
        self
    }

    /// Sets the replacement specification. An empty string is a valid
    /// replacement.
    pub fn to(mut self, to: impl Into<To>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Adds a custom content processor. Mutually exclusive with `from`/`to`.
    pub fn processor<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Path) -> String + Send + Sync + 'static,
    {
        self.processors.push(Arc::new(f));
        self
    }

    /// Sets the text encoding by label. Unknown labels silently fall back to
    /// UTF-8.
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Treats `files` entries as literal paths, bypassing glob expansion.
    pub fn disable_globs(mut self, disable: bool) -> Self {
        self.disable_globs = disable;
        self
    }

    /// Lets a zero-match pattern contribute no paths instead of failing.
    pub fn allow_empty_paths(mut self, allow: bool) -> Self {
        self.allow_empty_paths = allow;
        self
    }

    /// Carries match and replacement counts on each result.
    pub fn count_matches(mut self, count: bool) -> Self {
        self.count_matches = count;
        self
    }

    /// Computes results without writing anything to disk.
    pub fn dry(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Maps each source path to the path written to, enabling copy-style
    /// rewrites (read A, write B). Defaults to identity.
    pub fn target_file<F>(mut self, f: F) -> Self
    where
        F: Fn(&Path) -> PathBuf + Send + Sync + 'static,
    {
        self.get_target_file = Some(Arc::new(f));
        self
    }

    /// Overrides glob expansion options.
    pub fn glob(mut self, options: GlobOptions) -> Self {
        self.glob = Some(options);
        self
    }

    /// Swaps the asynchronous filesystem capability (defaults to real disk
    /// access).
    pub fn fs(mut self, fs: Arc<dyn AsyncFileIo>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Swaps the synchronous filesystem capability.
    pub fn fs_sync(mut self, fs: Arc<dyn SyncFileIo>) -> Self {
        self.fs_sync = Some(fs);
        self
    }

    /// Validates the collected settings and produces the immutable plan.
    pub fn build(self) -> Result<Config> {
        let job = if !self.processors.is_empty() {
            if !self.from.is_empty() || self.to.is_some() {
                return Err("Processors cannot be combined with from/to".into());
            }
            Job::Process {
                processors: self.processors,
            }
        } else {
            if self.files.is_empty() {
                return Err("Must specify file or files".into());
            }
            if self.from.is_empty() {
                return Err("Must specify string or regex to replace".into());
            }
            let Some(to) = self.to else {
                return Err("Must specify a replacement (can be blank string)".into());
            };
            Job::Replace {
                from: self.from,
                to,
            }
        };

        let encoding = match &self.encoding {
            Some(label) => crate::fs::resolve_encoding(label),
            None => UTF_8,
        };

        Ok(Config {
            files: self.files,
            ignore: self.ignore,
            job,
            encoding,
            disable_globs: self.disable_globs,
            allow_empty_paths: self.allow_empty_paths,
            count_matches: self.count_matches,
            dry: self.dry,
            verbose: self.verbose,
            quiet: self.quiet,
            get_target_file: self.get_target_file,
            glob: self.glob.unwrap_or_default(),
            fs: self.fs.unwrap_or_else(|| Arc::new(DiskIo)),
            fs_sync: self.fs_sync.unwrap_or_else(|| Arc::new(DiskIo)),
        })
    }
}

/// A value that may be given as a scalar or a sequence in a config document.
#[derive(Deserialize, Clone)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        }
    }
}

/// The on-disk configuration document shape.
///
/// Field names are camel-cased to stay compatible with config files written
/// for the tool's scripting users. Callbacks and custom filesystems cannot be
/// expressed here; those are library-only features.
#[derive(Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfig {
    pub files: Option<OneOrMany<String>>,
    pub ignore: Option<OneOrMany<String>>,
    pub from: Option<OneOrMany<String>>,
    pub to: Option<OneOrMany<String>>,
    pub encoding: Option<String>,
    pub disable_globs: Option<bool>,
    pub is_regex: Option<bool>,
    pub allow_empty_paths: Option<bool>,
    pub count_matches: Option<bool>,
    pub dry: Option<bool>,
    pub verbose: Option<bool>,
    pub quiet: Option<bool>,
}

impl RawConfig {
    /// Normalizes the document into an executable [`Config`].
    pub fn into_config(self) -> Result<Config> {
        let mut builder = Config::builder();

        if let Some(files) = self.files {
            builder = builder.files(files.into_vec());
        }
        if let Some(ignore) = self.ignore {
            builder = builder.ignore_all(ignore.into_vec());
        }

        let is_regex = self.is_regex.unwrap_or(false);
        if let Some(from) = self.from {
            for value in from.into_vec() {
                builder = builder.from(parse_from_string(&value, is_regex)?);
            }
        }
        if let Some(to) = self.to {
            builder = match to {
                OneOrMany::One(value) => builder.to(value),
                OneOrMany::Many(values) => {
                    builder.to(values.into_iter().map(Rewrite::from).collect::<Vec<_>>())
                }
            };
        }

        if let Some(encoding) = self.encoding {
            builder = builder.encoding(encoding);
        }

        builder
            .disable_globs(self.disable_globs.unwrap_or(false))
            .allow_empty_paths(self.allow_empty_paths.unwrap_or(false))
            .count_matches(self.count_matches.unwrap_or(false))
            .dry(self.dry.unwrap_or(false))
            .verbose(self.verbose.unwrap_or(false))
            .quiet(self.quiet.unwrap_or(false))
            .build()
    }
}

/// Interprets a `from` string from a config document or the command line.
///
/// With `is_regex` the string is compiled as a global pattern outright.
/// Otherwise a `/pattern/flags` shaped string is reinterpreted as a pattern
/// (see [`parse_delimited`] for the caveats) and anything else is matched as
/// a literal substring.
pub fn parse_from_string(value: &str, is_regex: bool) -> Result<Query> {
    if is_regex {
        return Ok(Query::Pattern(Pattern::with_flags(value, "g")?));
    }
    match parse_delimited(value) {
        Some(pattern) => Ok(Query::Pattern(pattern?)),
        None => Ok(Query::Literal(value.to_string())),
    }
}

/// Loads configuration documents from disk.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads a config file, choosing the parser by extension: `.yaml`/`.yml`
    /// are parsed as YAML, everything else as JSON.
    pub fn load(path: &Path) -> Result<RawConfig> {
        let text = fs::read_to_string(path)?;
        let raw = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            _ => serde_json::from_str(&text)?,
        };
        Ok(raw)
    }
}
