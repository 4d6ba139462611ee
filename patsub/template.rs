//! Flat `{field}` templates.
//!
//! A placeholder is a `{`, followed by any text not containing `}`, followed
//! by `}`. There is no escaping and no nesting: `{{a}` is the field `{a`.
//!
//! Validation is strict (every field must be known, and at least one field
//! must be referenced), while expansion is lenient: fields without a binding
//! expand to the empty string. Callers wanting strict expansion validate
//! first.

use std::{
    borrow::Borrow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    hash::{BuildHasher, Hash},
    ops::Range,
    sync::LazyLock,
};

use indexmap::{IndexMap, IndexSet};
use regex::{NoExpand, Regex};

use crate::{FieldError, literal_regex, scan::find_all};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]*)\}").expect("placeholder regex is valid"));

/// A single `{field}` occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder<'a> {
    /// The field name, without braces.
    pub field: &'a str,
    /// The whole placeholder, including braces.
    pub text: &'a str,
    /// Byte range of `text` in the template.
    pub span: Range<usize>,
}

impl<'a> Placeholder<'a> {
    fn from_span(template: &'a str, span: Range<usize>) -> Self {
        Self {
            field: &template[span.start + 1..span.end - 1],
            text: &template[span.clone()],
            span,
        }
    }
}

/// The set of fields a template is allowed to reference.
pub trait FieldSet {
    fn contains_field(&self, field: &str) -> bool;
}

/// Values to substitute for fields.
pub trait Bindings {
    fn lookup(&self, field: &str) -> Option<&str>;
}

impl<F: FieldSet + ?Sized> FieldSet for &F {
    #[inline]
    fn contains_field(&self, field: &str) -> bool {
        (**self).contains_field(field)
    }
}

impl<T: AsRef<str>> FieldSet for [T] {
    fn contains_field(&self, field: &str) -> bool {
        self.iter().any(|f| f.as_ref() == field)
    }
}

impl<T: AsRef<str>, const N: usize> FieldSet for [T; N] {
    #[inline]
    fn contains_field(&self, field: &str) -> bool {
        self.as_slice().contains_field(field)
    }
}

impl<T: AsRef<str>> FieldSet for Vec<T> {
    #[inline]
    fn contains_field(&self, field: &str) -> bool {
        self.as_slice().contains_field(field)
    }
}

impl<T, S> FieldSet for HashSet<T, S>
where
    T: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn contains_field(&self, field: &str) -> bool {
        self.contains(field)
    }
}

impl<T, S> FieldSet for IndexSet<T, S>
where
    T: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn contains_field(&self, field: &str) -> bool {
        self.contains(field)
    }
}

impl<T: Borrow<str> + Ord> FieldSet for BTreeSet<T> {
    #[inline]
    fn contains_field(&self, field: &str) -> bool {
        self.contains(field)
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    #[inline]
    fn lookup(&self, field: &str) -> Option<&str> {
        (**self).lookup(field)
    }
}

impl<K, V, S> Bindings for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    #[inline]
    fn lookup(&self, field: &str) -> Option<&str> {
        self.get(field).map(AsRef::as_ref)
    }
}

impl<K, V, S> Bindings for IndexMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    #[inline]
    fn lookup(&self, field: &str) -> Option<&str> {
        self.get(field).map(AsRef::as_ref)
    }
}

impl<K: Borrow<str> + Ord, V: AsRef<str>> Bindings for BTreeMap<K, V> {
    #[inline]
    fn lookup(&self, field: &str) -> Option<&str> {
        self.get(field).map(AsRef::as_ref)
    }
}

/// Build a bindings map from a list of pairs.
pub fn bindings<I, K, V>(pairs: I) -> ahash::HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Every placeholder in `template`, in order of appearance, including
/// repeated ones.
#[must_use]
pub fn extract_placeholders(template: &str) -> Vec<Placeholder<'_>> {
    find_all(&PLACEHOLDER, template)
        .into_iter()
        .map(|m| Placeholder::from_span(template, m.span))
        .collect()
}

/// Check that `template` references at least one field, and only fields in
/// `fields`.
pub fn validate<F: FieldSet + ?Sized>(template: &str, fields: &F) -> Result<(), FieldError> {
    validate_placeholders(&extract_placeholders(template), fields)
}

/// Substitute every placeholder in `template` with its binding, or the empty
/// string if the field is unbound.
///
/// ```
/// let bindings = patsub::bindings([("name", "Ada")]);
/// assert_eq!(
///     patsub::expand("Hello {name}, you are {age}", &bindings),
///     "Hello Ada, you are "
/// );
/// ```
#[must_use]
pub fn expand<B: Bindings + ?Sized>(template: &str, bindings: &B) -> String {
    expand_placeholders(template, &extract_placeholders(template), bindings)
}

fn validate_placeholders<F: FieldSet + ?Sized>(
    placeholders: &[Placeholder<'_>],
    fields: &F,
) -> Result<(), FieldError> {
    if placeholders.is_empty() {
        tracing::debug!("template has no placeholders");
        return Err(FieldError::NoFields);
    }

    for placeholder in placeholders {
        if !fields.contains_field(placeholder.field) {
            tracing::debug!(
                "unknown field `{}` at {:?}",
                placeholder.field,
                placeholder.span
            );
            return Err(FieldError::UnknownField(placeholder.field.to_owned()));
        }
    }

    Ok(())
}

/// Replaces each distinct placeholder in turn, in order of first appearance,
/// on a working copy of the template. Values are inserted verbatim, but a
/// value that itself contains a later placeholder gets that placeholder
/// replaced as well.
fn expand_placeholders<B: Bindings + ?Sized>(
    template: &str,
    placeholders: &[Placeholder<'_>],
    bindings: &B,
) -> String {
    let distinct: IndexMap<&str, &str> = placeholders.iter().map(|p| (p.text, p.field)).collect();

    let mut working = template.to_owned();
    for (text, field) in distinct {
        let value = bindings.lookup(field).unwrap_or_default();
        working = match literal_regex(text) {
            Ok(regex) => regex.replace_all(&working, NoExpand(value)).into_owned(),
            Err(err) => {
                // Only reachable for placeholders exceeding the regex size limit.
                tracing::warn!("falling back to plain replacement for `{text}`: {err}");
                working.replace(text, value)
            }
        };
    }
    working
}

/// A template with its placeholders already located.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    source: String,
    spans: Box<[Range<usize>]>,
}

impl Template {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let spans = extract_placeholders(&source)
            .into_iter()
            .map(|p| p.span)
            .collect();
        Self { source, spans }
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder<'_>> {
        self.spans
            .iter()
            .map(|span| Placeholder::from_span(&self.source, span.clone()))
    }

    /// Distinct field names, in order of first appearance.
    #[must_use]
    pub fn fields(&self) -> IndexSet<&str> {
        self.placeholders().map(|p| p.field).collect()
    }

    pub fn validate<F: FieldSet + ?Sized>(&self, fields: &F) -> Result<(), FieldError> {
        validate_placeholders(&self.placeholders().collect::<Vec<_>>(), fields)
    }

    #[must_use]
    pub fn expand<B: Bindings + ?Sized>(&self, bindings: &B) -> String {
        expand_placeholders(
            &self.source,
            &self.placeholders().collect::<Vec<_>>(),
            bindings,
        )
    }
}

impl From<&str> for Template {
    #[inline]
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Template {
    #[inline]
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
