//! Compiling shell-style globs into regular expressions.
//!
//! Supported syntax:
//!
//! - `*` matches any run of characters except `/`.
//! - `?` matches exactly one character except `/`.
//! - `{a,b,c}` matches one of the alternatives. Alternatives may nest.
//! - `\x` matches `x` literally.
//! - Everything else matches itself, except that `[...]` is passed through to
//!   the regex engine as a character class.
//!
//! Path segments starting with `.` (dot-files) are never matched unless the
//! glob spells out the dot, either as its first character or directly after a
//! `/`.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::{
    Error, PatternError,
    matcher::{GUARD_PREFIX, Matcher},
};

/// Zero-width assertion that the next character is not a dot.
const NOT_DOT_FILE: &str = r"(?!\.)";
/// Any run of characters within one path segment.
const ANY_RUN: &str = "[^/]*";
/// Exactly one character within one path segment.
const ANY_ONE: &str = "[^/]";

/// Characters that have to be escaped when they appear in a glob, because
/// they would otherwise be interpreted by the regex engine.
#[inline]
const fn needs_glob_escape(ch: char) -> bool {
    matches!(ch, '.' | '(' | ')' | '|' | '+' | '^' | '$' | '@' | '%')
}

/// How a dot-file guard is written into the generated regex.
#[derive(Debug, Clone, Copy)]
enum Guard {
    /// `(?!\.)`, as published by [`glob_to_regex`].
    Lookahead,
    /// An empty named group, evaluated by the glob matcher.
    Marker,
}

/// Translation state for one left-to-right pass over a glob.
struct Translator<'a> {
    pattern: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    regex: String,
    /// Offsets of the currently open `{`. The length is the brace depth.
    open_braces: Vec<usize>,
    guard: Guard,
    num_guards: usize,
}

impl<'a> Translator<'a> {
    fn new(pattern: &'a str, guard: Guard) -> Self {
        Self {
            pattern,
            chars: pattern.char_indices().peekable(),
            regex: String::with_capacity(pattern.len() * 2),
            open_braces: Vec::new(),
            guard,
            num_guards: 0,
        }
    }

    fn push_guard(&mut self) {
        match self.guard {
            Guard::Lookahead => self.regex.push_str(NOT_DOT_FILE),
            Guard::Marker => {
                _ = write!(self.regex, "(?P<{}{}>)", GUARD_PREFIX, self.num_guards);
            }
        }
        self.num_guards += 1;
    }

    fn translate(mut self) -> Result<String, PatternError> {
        if !self.pattern.starts_with('.') {
            self.push_guard();
        }

        while let Some((offset, ch)) = self.chars.next() {
            match ch {
                '\\' => {
                    let Some((_, escaped)) = self.chars.next() else {
                        return Err(PatternError::TrailingEscape { offset });
                    };
                    self.regex.push('\\');
                    self.regex.push(escaped);
                }
                '/' => {
                    self.regex.push('/');
                    if !matches!(self.chars.peek(), Some((_, '.'))) {
                        self.push_guard();
                    }
                }
                '*' => self.regex.push_str(ANY_RUN),
                '?' => self.regex.push_str(ANY_ONE),
                '{' => {
                    self.regex.push('(');
                    self.open_braces.push(offset);
                }
                '}' => {
                    if self.open_braces.pop().is_none() {
                        return Err(PatternError::UnmatchedClose { offset });
                    }
                    self.regex.push(')');
                }
                ',' if !self.open_braces.is_empty() => self.regex.push('|'),
                ch if needs_glob_escape(ch) => {
                    self.regex.push('\\');
                    self.regex.push(ch);
                }
                ch => self.regex.push(ch),
            }
        }

        if let Some(&offset) = self.open_braces.last() {
            return Err(PatternError::UnclosedBrace { offset });
        }
        Ok(self.regex)
    }
}

/// Translate a glob into the equivalent regular expression text.
///
/// The result is not anchored. Use [`compile_glob`] to get a whole-string
/// matcher.
///
/// ```
/// assert_eq!(patsub::glob_to_regex("*.txt").unwrap(), r"(?!\.)[^/]*\.txt");
/// assert_eq!(patsub::glob_to_regex(".*").unwrap(), r"\.[^/]*");
/// ```
pub fn glob_to_regex(pattern: &str) -> Result<String, PatternError> {
    Translator::new(pattern, Guard::Lookahead).translate()
}

/// Compile a glob into a whole-string matcher.
pub fn compile_glob(pattern: &str) -> Result<Glob, Error> {
    let regex_str = glob_to_regex(pattern)?;
    tracing::trace!("compiled glob `{pattern}` to `{regex_str}`");
    let matcher = Matcher::new(&Translator::new(pattern, Guard::Marker).translate()?)?;
    Ok(Glob {
        source: pattern.into(),
        regex_str: regex_str.into(),
        matcher,
    })
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    source: Box<str>,
    regex_str: Box<str>,
    matcher: Matcher,
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Glob {}

impl std::hash::Hash for Glob {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl Glob {
    #[inline]
    pub fn new(pattern: &str) -> Result<Self, Error> {
        compile_glob(pattern)
    }

    /// The glob this was compiled from.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The generated regex text, without anchors.
    #[inline]
    #[must_use]
    pub fn regex_str(&self) -> &str {
        &self.regex_str
    }

    /// True if the whole of `path` matches the glob.
    #[inline]
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

impl std::str::FromStr for Glob {
    type Err = Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile_glob(s)
    }
}

impl std::fmt::Display for Glob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// An ordered collection of named globs.
#[derive(Debug, Clone, Default)]
pub struct GlobList {
    globs: IndexMap<String, Glob>,
}

impl GlobList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` and add it under `name`. Replaces (and returns) a
    /// previous glob with the same name, keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, pattern: &str) -> Result<Option<Glob>, Error> {
        let glob = compile_glob(pattern)?;
        Ok(self.globs.insert(name.into(), glob))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Glob> {
        self.globs.get(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.globs.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Glob)> {
        self.globs.iter().map(|(name, glob)| (name.as_str(), glob))
    }

    /// Names of all globs matching `path`, in insertion order.
    pub fn matches<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter()
            .filter(move |(_, glob)| glob.is_match(path))
            .map(|(name, _)| name)
    }

    /// The first glob (in insertion order) matching `path`.
    #[must_use]
    pub fn first_match(&self, path: &str) -> Option<(&str, &Glob)> {
        self.iter().find(|(_, glob)| glob.is_match(path))
    }
}
