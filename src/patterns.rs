use crate::errors::Result;
use regex::{Captures, Regex};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A compiled match pattern with flag semantics.
///
/// Flags follow the conventional one-letter syntax: `i` (case-insensitive),
/// `m` (multi-line), `s` (dot matches newline), `x` (ignore whitespace) and
/// `g` (global). A global pattern replaces every occurrence; a non-global
/// pattern replaces only the first one. The `u` and `y` letters are accepted
/// for compatibility with configs written for other engines and ignored.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    global: bool,
}

impl Pattern {
    /// Compiles a pattern without flags (replaces the first occurrence only).
    pub fn new(source: &str) -> Result<Self> {
        Self::with_flags(source, "")
    }

    /// Compiles a pattern with the given flag letters.
    pub fn with_flags(source: &str, flags: &str) -> Result<Self> {
        let mut inline = String::new();
        let mut global = false;
        for flag in flags.chars() {
            match flag {
                'i' | 'm' | 's' | 'x' => inline.push(flag),
                'g' => global = true,
                // Accepted for compatibility; no equivalent here
                'u' | 'y' => {}
                other => {
                    return Err(format!("Unknown pattern flag: {other}").into());
                }
            }
        }

        let expanded = if inline.is_empty() {
            source.to_string()
        } else {
            format!("(?{inline}){source}")
        };

        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(&expanded)?,
            global,
        })
    }

    /// The pattern source, without inline flag prefix.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the pattern replaces all occurrences rather than just the first.
    pub fn is_global(&self) -> bool {
        self.global
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("global", &self.global)
            .finish()
    }
}

/// Parses a `/pattern/flags` shaped string into a [`Pattern`].
///
/// Config files cannot carry compiled patterns, so a string that starts with a
/// slash and ends with a slash followed only by flag letters is reinterpreted
/// as a pattern. This heuristic is deliberately preserved from the tool's
/// lineage and can misfire: a literal search string that happens to have this
/// shape (say `/usr/bin/gs`, whose last segment spells flag letters) is parsed
/// as a pattern, not matched verbatim. Use an explicit [`Query::Literal`] if
/// that is not what you want.
pub fn parse_delimited(value: &str) -> Option<Result<Pattern>> {
    let rest = value.strip_prefix('/')?;
    let (body, flags) = rest.rsplit_once('/')?;
    if !flags.chars().all(|c| matches!(c, 'g' | 'i' | 'm' | 'y' | 'u' | 's')) {
        return None;
    }
    Some(Pattern::with_flags(body, flags))
}

/// A per-file match callback: receives the file path, returns the effective
/// query for that file.
pub type QueryFn = Arc<dyn Fn(&Path) -> Query + Send + Sync>;

/// The match side of a replacement rule.
///
/// A literal string is matched as an exact substring (its regex metacharacters
/// are escaped before compilation, so user input is never fed to the regex
/// engine raw) and replaces the first occurrence only. Patterns carry their
/// own flag semantics. A `PerFile` query is resolved against each file path
/// before matching, enabling file-dependent rules.
#[derive(Clone)]
pub enum Query {
    Literal(String),
    Pattern(Pattern),
    PerFile(QueryFn),
}

impl Query {
    /// Wraps a callback resolved once per file.
    pub fn per_file<F>(f: F) -> Self
    where
        F: Fn(&Path) -> Query + Send + Sync + 'static,
    {
        Query::PerFile(Arc::new(f))
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::Literal(s.to_string())
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::Literal(s)
    }
}

impl From<Pattern> for Query {
    fn from(p: Pattern) -> Self {
        Query::Pattern(p)
    }
}

/// A single match occurrence handed to replacement callbacks.
pub struct MatchView<'a> {
    /// The full matched text.
    pub matched: &'a str,
    /// Capture groups, in order, `None` for groups that did not participate.
    pub captures: Vec<Option<&'a str>>,
    /// Byte offset of the match within `contents`.
    pub offset: usize,
    /// The full contents being searched.
    pub contents: &'a str,
    /// The file the contents were read from.
    pub file: &'a Path,
}

/// A per-match replacement callback.
pub type RewriteFn = Arc<dyn Fn(&MatchView) -> String + Send + Sync>;

/// The replacement side of a rule: fixed text or a per-match callback.
///
/// Literal replacement text may use `$1`, `$<name>`, `$&` and `$$`
/// backreference syntax when paired with a pattern query.
#[derive(Clone)]
pub enum Rewrite {
    Literal(String),
    PerMatch(RewriteFn),
}

impl Rewrite {
    /// Wraps a callback invoked for every match occurrence.
    pub fn per_match<F>(f: F) -> Self
    where
        F: Fn(&MatchView) -> String + Send + Sync + 'static,
    {
        Rewrite::PerMatch(Arc::new(f))
    }
}

impl From<&str> for Rewrite {
    fn from(s: &str) -> Self {
        Rewrite::Literal(s.to_string())
    }
}

impl From<String> for Rewrite {
    fn from(s: String) -> Self {
        Rewrite::Literal(s)
    }
}

/// The replacement specification: one value shared by all queries, or a
/// sequence aligned with the query list by index.
#[derive(Clone)]
pub enum To {
    One(Rewrite),
    Many(Vec<Rewrite>),
}

impl To {
    /// The replacement for query index `i`.
    ///
    /// A scalar replacement applies to every query. With a sequence, an index
    /// past its end yields `None`, which skips that query's substitution.
    pub(crate) fn get(&self, i: usize) -> Option<&Rewrite> {
        match self {
            To::One(rewrite) => Some(rewrite),
            To::Many(rewrites) => rewrites.get(i),
        }
    }
}

impl From<&str> for To {
    fn from(s: &str) -> Self {
        To::One(Rewrite::from(s))
    }
}

impl From<String> for To {
    fn from(s: String) -> Self {
        To::One(Rewrite::from(s))
    }
}

impl From<Rewrite> for To {
    fn from(r: Rewrite) -> Self {
        To::One(r)
    }
}

impl From<Vec<Rewrite>> for To {
    fn from(rs: Vec<Rewrite>) -> Self {
        To::Many(rs)
    }
}

/// Translates conventional replacement-template syntax into the form the
/// `regex` crate expands.
///
/// `$&` becomes `${0}`, numbered and named groups are wrapped in braces so a
/// digit followed by text (`$1suffix`) keeps its meaning, `$$` stays a literal
/// dollar, and any other `$` is escaped so it comes out verbatim.
pub(crate) fn translate_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&'$') => {
                chars.next();
                out.push_str("$$");
            }
            Some(&'&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(&'<') => {
                chars.next();
                let mut name = String::new();
                for n in chars.by_ref() {
                    if n == '>' {
                        break;
                    }
                    name.push(n);
                }
                out.push_str("${");
                out.push_str(&name);
                out.push('}');
            }
            Some(&d) if d.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                out.push_str("${");
                out.push_str(&digits);
                out.push('}');
            }
            // A dollar not followed by a group reference stays literal
            _ => out.push_str("$$"),
        }
    }
    out
}

/// Expands a translated template against a set of captures.
pub(crate) fn expand_template(caps: &Captures, translated: &str) -> String {
    let mut out = String::new();
    caps.expand(translated, &mut out);
    out
}
