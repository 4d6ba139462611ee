//! Non-backtracking evaluation of the regex generated for a glob.
//!
//! The regex text is parsed with `regex-syntax`, with every dot-file guard
//! written as an empty named group instead of a lookahead. Matching walks the
//! syntax tree carrying the set of byte offsets reachable so far, so the cost
//! is bounded by the size of the tree times the square of the input length,
//! no matter how many ways there are to split the input between wildcards.

use regex_syntax::hir::{Class, Hir, HirKind, Look, Repetition};

/// Name prefix of the empty groups standing in for `(?!\.)`.
pub(crate) const GUARD_PREFIX: &str = "dotguard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Matcher {
    hir: Hir,
}

impl Matcher {
    pub fn new(regex: &str) -> Result<Self, regex_syntax::Error> {
        let hir = regex_syntax::Parser::new().parse(regex)?;
        Ok(Self { hir })
    }

    /// True if the whole of `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        let mut start = Offsets::empty(text.len());
        start.insert(0);
        Walk { text }.step(&self.hir, &start).contains(text.len())
    }
}

/// Set of byte offsets into the text, `0..=len`.
#[derive(Debug, Clone)]
struct Offsets(Box<[bool]>);

impl Offsets {
    fn empty(len: usize) -> Self {
        Self(vec![false; len + 1].into_boxed_slice())
    }

    /// Returns true if `at` was not in the set before.
    #[inline]
    fn insert(&mut self, at: usize) -> bool {
        !std::mem::replace(&mut self.0[at], true)
    }

    #[inline]
    fn contains(&self, at: usize) -> bool {
        self.0[at]
    }

    fn is_empty(&self) -> bool {
        !self.0.contains(&true)
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(at, &present)| present.then_some(at))
    }
}

struct Walk<'a> {
    text: &'a str,
}

impl Walk<'_> {
    /// All offsets where `hir` can end when started at any offset in `from`.
    fn step(&self, hir: &Hir, from: &Offsets) -> Offsets {
        match hir.kind() {
            HirKind::Empty => from.clone(),
            HirKind::Literal(literal) => self.advance(from, |at| {
                self.text.as_bytes()[at..]
                    .starts_with(&literal.0)
                    .then_some(literal.0.len())
            }),
            HirKind::Class(Class::Unicode(class)) => self.advance(from, |at| {
                let ch = self.text.get(at..)?.chars().next()?;
                class
                    .ranges()
                    .iter()
                    .any(|range| range.start() <= ch && ch <= range.end())
                    .then_some(ch.len_utf8())
            }),
            HirKind::Class(Class::Bytes(class)) => self.advance(from, |at| {
                let byte = *self.text.as_bytes().get(at)?;
                class
                    .ranges()
                    .iter()
                    .any(|range| range.start() <= byte && byte <= range.end())
                    .then_some(1)
            }),
            HirKind::Look(look) => self.retain(from, |at| self.look_matches(*look, at)),
            HirKind::Capture(capture)
                if capture
                    .name
                    .as_deref()
                    .is_some_and(|name| name.starts_with(GUARD_PREFIX)) =>
            {
                self.retain(from, |at| self.text.as_bytes().get(at) != Some(&b'.'))
            }
            HirKind::Capture(capture) => self.step(&capture.sub, from),
            HirKind::Concat(hirs) => hirs
                .iter()
                .fold(from.clone(), |reached, hir| self.step(hir, &reached)),
            HirKind::Alternation(hirs) => {
                let mut reached = Offsets::empty(self.text.len());
                for hir in hirs {
                    for at in self.step(hir, from).iter() {
                        reached.insert(at);
                    }
                }
                reached
            }
            HirKind::Repetition(repetition) => self.repeat(repetition, from),
        }
    }

    fn repeat(&self, repetition: &Repetition, from: &Offsets) -> Offsets {
        let mut reached = from.clone();
        for _ in 0..repetition.min {
            reached = self.step(&repetition.sub, &reached);
        }

        // An offset reached again after more iterations has no more options
        // left than the first time, so only new offsets need to be expanded.
        let mut frontier = reached.clone();
        let mut count = repetition.min;
        while repetition.max.is_none_or(|max| count < max) && !frontier.is_empty() {
            let next = self.step(&repetition.sub, &frontier);
            frontier = Offsets::empty(self.text.len());
            for at in next.iter() {
                if reached.insert(at) {
                    frontier.insert(at);
                }
            }
            count += 1;
        }
        reached
    }

    fn advance(&self, from: &Offsets, width_at: impl Fn(usize) -> Option<usize>) -> Offsets {
        let mut reached = Offsets::empty(self.text.len());
        for at in from.iter() {
            if let Some(width) = width_at(at) {
                reached.insert(at + width);
            }
        }
        reached
    }

    fn retain(&self, from: &Offsets, keep: impl Fn(usize) -> bool) -> Offsets {
        let mut reached = Offsets::empty(self.text.len());
        for at in from.iter().filter(|&at| keep(at)) {
            reached.insert(at);
        }
        reached
    }

    fn look_matches(&self, look: Look, at: usize) -> bool {
        let len = self.text.len();
        let before = self.text.get(..at).and_then(|s| s.chars().next_back());
        let after = self.text.get(at..).and_then(|s| s.chars().next());
        let ascii = |ch: Option<char>| ch.is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        let unicode = |ch: Option<char>| ch.is_some_and(|ch| ch.is_alphanumeric() || ch == '_');

        match look {
            Look::Start => at == 0,
            Look::End => at == len,
            Look::StartLF => at == 0 || before == Some('\n'),
            Look::EndLF => at == len || after == Some('\n'),
            Look::StartCRLF => {
                at == 0 || before == Some('\n') || (before == Some('\r') && after != Some('\n'))
            }
            Look::EndCRLF => {
                at == len || after == Some('\r') || (after == Some('\n') && before != Some('\r'))
            }
            Look::WordAscii => ascii(before) != ascii(after),
            Look::WordAsciiNegate => ascii(before) == ascii(after),
            Look::WordUnicode => unicode(before) != unicode(after),
            Look::WordUnicodeNegate => unicode(before) == unicode(after),
            Look::WordStartAscii => !ascii(before) && ascii(after),
            Look::WordEndAscii => ascii(before) && !ascii(after),
            Look::WordStartUnicode => !unicode(before) && unicode(after),
            Look::WordEndUnicode => unicode(before) && !unicode(after),
            Look::WordStartHalfAscii => !ascii(before),
            Look::WordEndHalfAscii => !ascii(after),
            Look::WordStartHalfUnicode => !unicode(before),
            Look::WordEndHalfUnicode => !unicode(after),
        }
    }
}
