use thiserror::Error;

/// The primary error type for all operations in the `resub` crate.
///
/// This enum uses `thiserror` to neatly wrap the various kinds of errors that can
/// occur, from I/O issues to configuration problems. Errors are always surfaced to
/// the caller; the library itself never logs or swallows them.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// An invalid or incomplete configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// A glob pattern matched no files while empty matches were disallowed.
    #[error("No files match the pattern: {pattern}")]
    NoMatch { pattern: String },

    /// A malformed glob pattern.
    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// An error raised while walking glob matches (e.g. an unreadable directory).
    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// An error that occurred while parsing a YAML configuration file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error related to JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A background task failed to complete.
    #[error("Task error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A convenient type alias for `Result<T, resub::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
