use patsub::{Fragment, concat, find_all, literal_regex, quote_literal, scan, scan_with};
use regex::Regex;

static LITERALS: &[&str] = &[
    "",
    "plain",
    "a.b",
    "(a|b)+",
    "^start$",
    "C:\\Program Files\\x",
    "{name}",
    "[a-z]*?",
    "50% off @ 3/4, please",
    "日本語 {field} ü",
    "tab\tand\nnewline",
];

#[test]
fn quoted_literal_scans_as_one_match() -> anyhow::Result<()> {
    for s in LITERALS {
        let regex = Regex::new(&quote_literal(s))?;
        let fragments = scan(&regex, s);
        let matched: Vec<_> = fragments.iter().filter(|f| f.is_matched()).collect();
        assert_eq!(matched.len(), 1, "scanning {s:?}");
        assert_eq!(matched[0].text(), *s);
        assert_eq!(matched[0].span(), 0..s.len());
        assert!(
            fragments
                .iter()
                .filter(|f| !f.is_matched())
                .all(|f| f.text().is_empty())
        );
    }
    Ok(())
}

#[test]
fn quoted_literal_inside_larger_text() -> anyhow::Result<()> {
    let needle = "a.b";
    let regex = literal_regex(needle)?;
    let fragments = scan(&regex, "axb a.b a.b.");
    let spans: Vec<_> = fragments
        .iter()
        .filter(|f| f.is_matched())
        .map(Fragment::span)
        .collect();
    assert_eq!(spans, [4..7, 8..11]);
    Ok(())
}

#[test]
fn scan_and_find_all_agree() -> anyhow::Result<()> {
    let cases = [
        (r"\d+", "a1b22c333"),
        (r"\{([^}]*)\}", "Hello {name}, {x}{y}!"),
        (r"o*", "foo boo"),
        (r"x", "no match here"),
        (r"(a)|(b)", "abcab"),
        (r"", "abc"),
    ];

    for (pattern, text) in cases {
        let regex = Regex::new(pattern)?;
        let from_scan: Vec<_> = scan(&regex, text)
            .into_iter()
            .filter(Fragment::is_matched)
            .map(|f| (f.span(), f.text().to_owned()))
            .collect();
        let from_find_all: Vec<_> = find_all(&regex, text)
            .into_iter()
            .map(|m| (m.span.clone(), m.full().to_owned()))
            .collect();
        assert_eq!(from_scan, from_find_all, "pattern `{pattern}` on {text:?}");
    }
    Ok(())
}

#[test]
fn fragments_reconstruct_input() -> anyhow::Result<()> {
    let regex = Regex::new(r"[aeiou]+")?;
    for text in ["", "rhythm", "queueing", "a", "banana"] {
        let fragments = scan(&regex, text);
        assert_eq!(concat(&fragments), text);
        assert!(matches!(fragments.last(), Some(Fragment::Literal { .. })));

        let mut cursor = 0;
        for fragment in &fragments {
            assert_eq!(fragment.span().start, cursor);
            cursor = fragment.span().end;
        }
        assert_eq!(cursor, text.len());
    }
    Ok(())
}

#[test]
fn transform_keeps_source_spans() -> anyhow::Result<()> {
    let regex = Regex::new(r"\{(\w+)\}")?;
    let text = "x{long_name}y";
    let fragments = scan_with(&regex, text, |caps| caps[1].len().to_string());
    assert_eq!(concat(&fragments), "x9y");
    assert_eq!(fragments[1].span(), 1..12);
    assert_eq!(fragments[1].text(), "9");
    Ok(())
}
