/// True if `ch` must be escaped with a backslash to be matched literally in a
/// regex produced by this crate.
#[inline]
#[must_use]
pub const fn needs_quote(ch: char) -> bool {
    matches!(
        ch,
        '.' | '('
            | ')'
            | '|'
            | '+'
            | '^'
            | '$'
            | '@'
            | '%'
            | '\\'
            | '/'
            | ','
            | '*'
            | '?'
            | '['
            | ']'
            | '{'
            | '}'
    )
}

/// Escape `s` so that it matches itself, and only itself, when used as a
/// regular expression.
///
/// ```
/// assert_eq!(patsub::quote_literal("a.b"), r"a\.b");
/// assert_eq!(patsub::quote_literal("{name}"), r"\{name\}");
/// ```
#[must_use]
pub fn quote_literal(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len());
    for ch in s.chars() {
        if needs_quote(ch) {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted
}

/// Compile a regex matching exactly `s`.
///
/// This only fails if the quoted literal exceeds the regex engine's size
/// limit.
pub fn literal_regex(s: &str) -> Result<regex::Regex, regex::Error> {
    regex::Regex::new(&quote_literal(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(quote_literal(""), "");
        assert_eq!(quote_literal("hello world"), "hello world");
        assert_eq!(quote_literal("snake_case-123"), "snake_case-123");
    }

    #[test]
    fn escapes_every_special_char() {
        assert_eq!(
            quote_literal(r".()|+^$@%\/,*?[]{}"),
            r"\.\(\)\|\+\^\$\@\%\\\/\,\*\?\[\]\{\}"
        );
    }

    #[test]
    fn multibyte_text() {
        assert_eq!(quote_literal("日本語.txt"), r"日本語\.txt");
    }

    #[test]
    fn quoted_literal_matches_itself() {
        for s in [
            "a.b",
            "(x|y)+",
            "^$",
            "C:\\path\\file.txt",
            "{name}",
            "[a-z]*?",
            "50% off @ 3/4, please",
        ] {
            let regex = literal_regex(s).unwrap();
            let m = regex.find(s).unwrap();
            assert_eq!(m.as_str(), s);
            assert_eq!(m.range(), 0..s.len());
        }
    }

    #[test]
    fn quoted_literal_does_not_match_lookalikes() {
        let regex = literal_regex("a.c").unwrap();
        assert!(!regex.is_match("abc"));
        let regex = literal_regex("a*").unwrap();
        assert!(!regex.is_match("aaa"));
        assert!(regex.is_match("a*"));
    }
}
