// SPDX-License-Identifier: PMPL-1.0-or-later
//! Placeholder canonicalization.
//!
//! Rewrites every `:name` placeholder in a query template to
//! `:normalized_param_{i}`, numbering matches left to right, and re-keys the
//! named bindings to match. Two queries that differ only in the names their
//! placeholders use end up with identical canonical text and bindings.
//!
//! Repeated occurrences of one name are *not* collapsed: `:a ... :a` becomes
//! `:normalized_param_0 ... :normalized_param_1`, both slots carrying the
//! value bound to `a`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::value::ParamValue;

/// Prefix of every canonical placeholder name.
pub const CANONICAL_PREFIX: &str = "normalized_param_";

/// A colon followed by one or more ASCII word characters or `$`.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[A-Za-z0-9_$]+").expect("placeholder pattern compiles"));

/// A placeholder occurrence in a query template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte offset of the leading `:`.
    pub start: usize,
    /// Byte offset one past the last name character.
    pub end: usize,
    /// Name without the leading `:`.
    pub name: &'a str,
}

/// Result of canonicalizing a template together with its named bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonicalized {
    pub text: String,
    pub named: BTreeMap<String, ParamValue>,
}

/// Canonical placeholder name for the `index`-th match.
pub fn canonical_name(index: usize) -> String {
    format!("{}{}", CANONICAL_PREFIX, index)
}

/// All placeholders in `text`, in text order.
pub fn placeholders(text: &str) -> Vec<Placeholder<'_>> {
    PLACEHOLDER
        .find_iter(text)
        .map(|m| Placeholder {
            start: m.start(),
            end: m.end(),
            name: &m.as_str()[1..],
        })
        .collect()
}

/// Rewrite `text` and `named` into canonical form.
///
/// The canonical mapping starts as a copy of `named`. For the i-th
/// placeholder the original name is removed and `normalized_param_{i}` is
/// bound to whatever `named` holds for that name (`Null` if nothing).
/// Bindings whose names never occur in the text keep their original names.
pub fn canonicalize(text: &str, named: &BTreeMap<String, ParamValue>) -> Canonicalized {
    let spans = placeholders(text);
    if spans.is_empty() {
        return Canonicalized {
            text: text.to_string(),
            named: named.clone(),
        };
    }

    let mut canonical_text = String::with_capacity(text.len() + spans.len() * CANONICAL_PREFIX.len());
    let mut canonical_named = named.clone();
    let mut cursor = 0;

    for (index, span) in spans.iter().enumerate() {
        let canonical = canonical_name(index);

        canonical_text.push_str(&text[cursor..span.start]);
        canonical_text.push(':');
        canonical_text.push_str(&canonical);
        cursor = span.end;

        canonical_named.remove(span.name);
        let value = named.get(span.name).cloned().unwrap_or(ParamValue::Null);
        canonical_named.insert(canonical, value);
    }
    canonical_text.push_str(&text[cursor..]);

    trace!(placeholders = spans.len(), "Canonicalized query text");

    Canonicalized {
        text: canonical_text,
        named: canonical_named,
    }
}
