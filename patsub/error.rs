use annotate_snippets::{Level, Renderer, Snippet};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// The regex engine rejected the text generated from a glob. For
    /// well-formed globs this does not happen, but character classes are
    /// passed through verbatim, so `[a-` ends up here.
    #[error("invalid regex: {0}")]
    Regex(#[from] Box<regex_syntax::Error>),
}

impl From<regex_syntax::Error> for Error {
    #[inline]
    fn from(err: regex_syntax::Error) -> Self {
        Self::Regex(Box::new(err))
    }
}

/// Malformed glob pattern. Offsets are byte offsets into the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unmatched `}}` in glob pattern")]
    UnmatchedClose { offset: usize },
    #[error("unclosed `{{` in glob pattern")]
    UnclosedBrace { offset: usize },
    #[error("glob pattern ends with an escape character")]
    TrailingEscape { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("template does not reference any fields")]
    NoFields,
    #[error("template references unknown field `{0}`")]
    UnknownField(String),
}

impl PatternError {
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        match *self {
            PatternError::UnmatchedClose { offset }
            | PatternError::UnclosedBrace { offset }
            | PatternError::TrailingEscape { offset } => offset,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PatternError::UnmatchedClose { .. } => "no `{` to close here",
            PatternError::UnclosedBrace { .. } => "this `{` is never closed",
            PatternError::TrailingEscape { .. } => "nothing left to escape",
        }
    }

    /// Attach the pattern the error was produced from, so it can be rendered
    /// with the offending character highlighted.
    #[must_use]
    pub fn with_source<'a>(&'a self, pattern: &'a str) -> LocatedPatternError<'a> {
        LocatedPatternError {
            pattern,
            error: self,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocatedPatternError<'a> {
    pub pattern: &'a str,
    pub error: &'a PatternError,
}

impl LocatedPatternError<'_> {
    /// Render without ANSI styling.
    #[must_use]
    pub fn render_plain(&self) -> String {
        self.render_with(&Renderer::plain())
    }

    #[must_use]
    pub fn render_with(&self, renderer: &Renderer) -> String {
        let title = self.error.to_string();
        let offset = self.error.offset().min(self.pattern.len());
        // All error positions point at single-byte ASCII characters.
        let end = (offset + 1).min(self.pattern.len());
        let message = Level::Error.title(&title).snippet(
            Snippet::source(self.pattern)
                .origin("pattern")
                .annotation(Level::Error.span(offset..end).label(self.error.label())),
        );
        renderer.render(message).to_string()
    }
}

impl std::fmt::Display for LocatedPatternError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_with(&Renderer::styled()))
    }
}

impl std::error::Error for LocatedPatternError<'_> {}
