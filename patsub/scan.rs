//! Splitting text into literal and matched fragments.

use std::{borrow::Cow, ops::Range};

use regex::{Captures, Regex};

/// A contiguous piece of the scanned text.
///
/// `span` is always the byte range of the source text the fragment covers,
/// even when a matched fragment's text was replaced by a transform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fragment<'a> {
    /// Text between matches. May be empty.
    Literal { span: Range<usize>, text: &'a str },
    /// A match, after the transform has been applied.
    Matched {
        span: Range<usize>,
        text: Cow<'a, str>,
    },
}

impl<'a> Fragment<'a> {
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Fragment::Literal { text, .. } => *text,
            Fragment::Matched { text, .. } => text.as_ref(),
        }
    }

    #[inline]
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        match self {
            Fragment::Literal { span, .. } | Fragment::Matched { span, .. } => span.clone(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Fragment::Matched { .. })
    }

    #[must_use]
    pub fn into_text(self) -> Cow<'a, str> {
        match self {
            Fragment::Literal { text, .. } => Cow::Borrowed(text),
            Fragment::Matched { text, .. } => text,
        }
    }
}

/// The full match and all capture groups of a single match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchGroups<'a> {
    pub span: Range<usize>,
    /// Group 0 is the full match. Groups that did not participate in the
    /// match are `None`.
    groups: Box<[Option<&'a str>]>,
}

impl<'a> MatchGroups<'a> {
    fn from_captures(captures: &Captures<'a>) -> Self {
        let full = captures.get_match();
        Self {
            span: full.range(),
            groups: captures.iter().map(|m| m.map(|m| m.as_str())).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn full(&self) -> &'a str {
        self.groups[0].unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&'a str> {
        self.groups.get(index).copied().flatten()
    }

    /// All groups, including the full match at index 0.
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[Option<&'a str>] {
        &self.groups
    }
}

fn interleave<'a>(
    text: &'a str,
    matches: impl Iterator<Item = (Range<usize>, Cow<'a, str>)>,
) -> Vec<Fragment<'a>> {
    let mut fragments = Vec::new();
    let mut cursor = 0;
    for (span, replacement) in matches {
        fragments.push(Fragment::Literal {
            span: cursor..span.start,
            text: &text[cursor..span.start],
        });
        cursor = span.end;
        fragments.push(Fragment::Matched {
            span,
            text: replacement,
        });
    }
    fragments.push(Fragment::Literal {
        span: cursor..text.len(),
        text: &text[cursor..],
    });
    tracing::trace!("scanned {} bytes into {} fragments", text.len(), fragments.len());
    fragments
}

/// Split `text` into literal and matched fragments.
///
/// Every match is preceded by a (possibly empty) literal fragment, and the
/// sequence always ends with a (possibly empty) literal fragment. With no
/// matches, the result is a single literal fragment holding all of `text`.
#[must_use]
pub fn scan<'a>(regex: &Regex, text: &'a str) -> Vec<Fragment<'a>> {
    interleave(
        text,
        regex
            .find_iter(text)
            .map(|m| (m.range(), Cow::Borrowed(m.as_str()))),
    )
}

/// Like [`scan`], but matched fragments hold the result of `transform`
/// instead of the matched text.
pub fn scan_with<'a, F>(regex: &Regex, text: &'a str, transform: F) -> Vec<Fragment<'a>>
where
    F: Fn(&Captures<'a>) -> String,
{
    interleave(
        text,
        regex.captures_iter(text).map(|captures| {
            let span = captures.get_match().range();
            (span, Cow::Owned(transform(&captures)))
        }),
    )
}

/// All matches of `regex` in `text`, with their capture groups.
#[must_use]
pub fn find_all<'a>(regex: &Regex, text: &'a str) -> Vec<MatchGroups<'a>> {
    regex
        .captures_iter(text)
        .map(|captures| MatchGroups::from_captures(&captures))
        .collect()
}

/// Join the text of all fragments.
#[must_use]
pub fn concat(fragments: &[Fragment<'_>]) -> String {
    let len = fragments.iter().map(|f| f.text().len()).sum();
    let mut buf = String::with_capacity(len);
    for fragment in fragments {
        buf.push_str(fragment.text());
    }
    buf
}

/// Replace every match of `regex` in `text` with the result of `transform`.
pub fn substitute<'a, F>(regex: &Regex, text: &'a str, transform: F) -> String
where
    F: Fn(&Captures<'a>) -> String,
{
    concat(&scan_with(regex, text, transform))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(span: Range<usize>, text: &str) -> Fragment<'_> {
        Fragment::Literal { span, text }
    }

    fn matched(span: Range<usize>, text: &str) -> Fragment<'_> {
        Fragment::Matched {
            span,
            text: Cow::Borrowed(text),
        }
    }

    #[test]
    fn no_matches() {
        let regex = Regex::new("x").unwrap();
        assert_eq!(scan(&regex, "abc"), [literal(0..3, "abc")]);
        assert_eq!(scan(&regex, ""), [literal(0..0, "")]);
    }

    #[test]
    fn interleaves_literals_and_matches() {
        let regex = Regex::new("[0-9]+").unwrap();
        assert_eq!(
            scan(&regex, "a1bb22c"),
            [
                literal(0..1, "a"),
                matched(1..2, "1"),
                literal(2..4, "bb"),
                matched(4..6, "22"),
                literal(6..7, "c"),
            ]
        );
    }

    #[test]
    fn empty_literals_at_edges_and_between_adjacent_matches() {
        let regex = Regex::new("[0-9]").unwrap();
        assert_eq!(
            scan(&regex, "12"),
            [
                literal(0..0, ""),
                matched(0..1, "1"),
                literal(1..1, ""),
                matched(1..2, "2"),
                literal(2..2, ""),
            ]
        );
    }

    #[test]
    fn transform_sees_capture_groups() {
        let regex = Regex::new(r"(\w+)=(\w+)").unwrap();
        let fragments = scan_with(&regex, "a=1, b=2", |caps| format!("{}:{}", &caps[2], &caps[1]));
        assert_eq!(concat(&fragments), "1:a, 2:b");
        assert_eq!(fragments[1].span(), 0..3);
        assert!(fragments[1].is_matched());
        assert_eq!(fragments[1].text(), "1:a");
    }

    #[test]
    fn spans_are_contiguous() {
        let regex = Regex::new("o").unwrap();
        let text = "foo boo zoo";
        let fragments = scan(&regex, text);
        let mut cursor = 0;
        for fragment in &fragments {
            assert_eq!(fragment.span().start, cursor);
            cursor = fragment.span().end;
        }
        assert_eq!(cursor, text.len());
        assert_eq!(concat(&fragments), text);
    }

    #[test]
    fn find_all_groups() {
        let regex = Regex::new(r"(\w)(\d)?").unwrap();
        let found = find_all(&regex, "a1 b");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].full(), "a1");
        assert_eq!(found[0].span, 0..2);
        assert_eq!(found[0].groups(), [Some("a1"), Some("a"), Some("1")]);
        assert_eq!(found[1].full(), "b");
        assert_eq!(found[1].group(1), Some("b"));
        assert_eq!(found[1].group(2), None);
        assert_eq!(found[1].group(3), None);
    }

    #[test]
    fn substitute_replaces_all() {
        let regex = Regex::new(r"\s+").unwrap();
        assert_eq!(substitute(&regex, "a  b\t c", |_| " ".to_owned()), "a b c");
    }
}
