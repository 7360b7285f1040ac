//! `resub` is a library for batch find-and-replace operations across files.
//!
//! It provides the core logic for the `resub` command-line tool but can also
//! be used as a standalone library. The main components are:
//!
//! - `config`: Normalizes user-supplied settings into an immutable execution
//!   plan, from the builder API or from JSON/YAML config files.
//! - `paths`: Expands glob patterns into concrete file lists, honoring ignore
//!   lists and the empty-match policy, in sync and async variants.
//! - `replacer`: Applies find/replace rules (or custom processor chains) to
//!   file contents and drives the per-file read-transform-write cycle.
//! - `patterns`: The match and replacement specification types, including
//!   per-file and per-match callbacks.
//! - `fs`: Swappable filesystem capabilities with real-disk defaults.
//!
//! The sync entry point processes files strictly in sequence; the async one
//! starts every file's pipeline concurrently and awaits them jointly. Both
//! report one [`ReplaceResult`] per file, in resolved-path order.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod output;
pub mod paths;
pub mod patterns;
pub mod replacer;

// Re-export main types for easier access by library users.
pub use config::{Config, ConfigBuilder, ConfigLoader, GlobOptions, Processor, RawConfig};
pub use errors::{Error, Result};
pub use fs::{AsyncFileIo, DiskIo, SyncFileIo};
pub use patterns::{MatchView, Pattern, Query, Rewrite, To};
pub use replacer::{run, run_many, run_many_sync, run_sync, ReplaceResult};
