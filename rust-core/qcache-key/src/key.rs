// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Query result cache keys.
//!
//! A [`QueryKey`] identifies one logical query execution: canonical query
//! text, pagination, the soft-deletion and single-result flags, and the bound
//! parameter values. Two keys are equal exactly when a result cached under one
//! may be served for the other.
//!
//! - **Canonical text**: placeholders are renumbered (see [`crate::canonical`]),
//!   so parameter naming does not affect identity.
//! - **Deep values**: array-valued bindings compare element by element, both
//!   positionally and inside the named mapping.
//! - **Precomputed hash**: computed once in the constructor; `Hash` only
//!   writes the cached value.
//! - **Diagnostic id**: every instance gets a fresh [`KeyId`] for log
//!   correlation. It never takes part in equality, hashing or serialization.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::canonical::canonicalize;
use crate::config::DescribeOptions;
use crate::hash;
use crate::value::ParamValue;

// ---------------------------------------------------------------------------
// KeyId
// ---------------------------------------------------------------------------

/// Per-instance diagnostic identifier (random v4 UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId(Uuid);

impl KeyId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// KeyParts
// ---------------------------------------------------------------------------

/// The caller-supplied inputs of a key, before canonicalization.
///
/// This is also the serialized form of a [`QueryKey`]: deserializing rebuilds
/// the canonical text and hash and assigns a fresh [`KeyId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParts {
    /// Query template exactly as supplied.
    pub query_text: String,
    pub first_row: u32,
    pub max_rows: u32,
    pub soft_deletion: bool,
    pub single_result: bool,
    /// Named bindings; `None` when the query has no named parameters at all.
    pub named: Option<BTreeMap<String, ParamValue>>,
    /// Positional bindings, slot `i` holding position `i + 1`; `None` when
    /// the query has no positional parameters.
    pub positional: Option<Vec<ParamValue>>,
}

// ---------------------------------------------------------------------------
// QueryKey
// ---------------------------------------------------------------------------

/// Immutable cache key for a query result.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use qcache_key::{KeyParts, ParamValue, QueryKey};
///
/// let key = |name: &str| {
///     let mut named = BTreeMap::new();
///     named.insert(name.to_string(), ParamValue::Int(1));
///     QueryKey::new(KeyParts {
///         query_text: format!("select o from Order o where o.id = :{}", name),
///         first_row: 0,
///         max_rows: 10,
///         soft_deletion: true,
///         single_result: false,
///         named: Some(named),
///         positional: None,
///     })
/// };
///
/// // Placeholder names do not matter, only their values and positions do.
/// assert_eq!(key("id"), key("orderId"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "KeyParts", from = "KeyParts")]
pub struct QueryKey {
    original_query: String,
    canonical_query: String,
    first_row: u32,
    max_rows: u32,
    soft_deletion: bool,
    single_result: bool,
    original_named: Option<BTreeMap<String, ParamValue>>,
    canonical_named: Option<BTreeMap<String, ParamValue>>,
    positional: Option<Vec<ParamValue>>,
    hash: u64,
    id: KeyId,
}

impl QueryKey {
    /// Canonicalize `parts` and compute the key's hash.
    ///
    /// Without named bindings the canonical text is the original text
    /// verbatim and no scanning happens.
    pub fn new(parts: KeyParts) -> Self {
        let (canonical_query, canonical_named) = match &parts.named {
            Some(named) => {
                let canonical = canonicalize(&parts.query_text, named);
                (canonical.text, Some(canonical.named))
            }
            None => (parts.query_text.clone(), None),
        };

        let mut key = Self {
            original_query: parts.query_text,
            canonical_query,
            first_row: parts.first_row,
            max_rows: parts.max_rows,
            soft_deletion: parts.soft_deletion,
            single_result: parts.single_result,
            original_named: parts.named,
            canonical_named,
            positional: parts.positional,
            hash: 0,
            id: KeyId::generate(),
        };
        key.hash = key.compute_hash();
        key
    }

    /// Query template as supplied by the caller.
    pub fn original_query(&self) -> &str {
        &self.original_query
    }

    /// Query template with canonical placeholder names.
    pub fn canonical_query(&self) -> &str {
        &self.canonical_query
    }

    pub fn first_row(&self) -> u32 {
        self.first_row
    }

    pub fn max_rows(&self) -> u32 {
        self.max_rows
    }

    pub fn soft_deletion(&self) -> bool {
        self.soft_deletion
    }

    pub fn single_result(&self) -> bool {
        self.single_result
    }

    /// Named bindings under their original names, sorted by name.
    pub fn original_named_parameters(&self) -> Option<&BTreeMap<String, ParamValue>> {
        self.original_named.as_ref()
    }

    /// Named bindings keyed to match [`canonical_query`](Self::canonical_query).
    pub fn named_parameters(&self) -> Option<&BTreeMap<String, ParamValue>> {
        self.canonical_named.as_ref()
    }

    pub fn positional_parameters(&self) -> Option<&[ParamValue]> {
        self.positional.as_deref()
    }

    /// The hash computed at construction.
    pub fn precomputed_hash(&self) -> u64 {
        self.hash
    }

    /// Diagnostic id of this instance.
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Human-readable rendering for logs. Never use it for identity.
    pub fn describe(&self) -> String {
        self.describe_with(&DescribeOptions::default())
    }

    pub fn describe_with(&self, options: &DescribeOptions) -> String {
        let render = |value: &ParamValue| {
            if options.redact_values {
                "***".to_string()
            } else {
                value.to_string()
            }
        };

        let trimmed = self.canonical_query.trim();
        let text = match options.max_query_len {
            Some(max) if trimmed.chars().count() > max => {
                format!("{}...", trimmed.chars().take(max).collect::<String>())
            }
            _ => trimmed.to_string(),
        };

        let positional = match &self.positional {
            Some(values) => format!(
                "[{}]",
                values.iter().map(render).collect::<Vec<_>>().join(", ")
            ),
            None => "null".to_string(),
        };

        let named = match &self.canonical_named {
            Some(map) => format!(
                "{{{}}}",
                map.iter()
                    .map(|(name, value)| format!("{}={}", name, render(value)))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            None => "null".to_string(),
        };

        format!(
            "Query{{\"{}\", id={}, firstRow={}, maxRows={}, softDeletion={}, singleResult={}, positionalParameters={}, namedParameters={}}}",
            text,
            self.id,
            self.first_row,
            self.max_rows,
            self.soft_deletion,
            self.single_result,
            positional,
            named
        )
    }

    /// SHA-256 fingerprint of the key's identity, as lowercase hex.
    ///
    /// Stable across processes and consistent with equality, so it can serve
    /// as a string key for an external cache or as a log correlation field.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"qcache-key/1");
        feed_str(&mut hasher, &self.canonical_query);
        hasher.update(self.first_row.to_be_bytes());
        hasher.update(self.max_rows.to_be_bytes());
        hasher.update([u8::from(self.soft_deletion), u8::from(self.single_result)]);

        match &self.positional {
            Some(values) => {
                hasher.update([1u8]);
                feed_len(&mut hasher, values.len());
                for value in values {
                    feed_value(&mut hasher, value);
                }
            }
            None => hasher.update([0u8]),
        }

        match &self.canonical_named {
            Some(map) => {
                hasher.update([1u8]);
                feed_len(&mut hasher, map.len());
                for (name, value) in map {
                    feed_str(&mut hasher, name);
                    feed_value(&mut hasher, value);
                }
            }
            None => hasher.update([0u8]),
        }

        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<String>()
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Ordered ×31 combination of the scalar fields and positional values,
    /// plus an order-insensitive sum over the named entries.
    fn compute_hash(&self) -> u64 {
        let positional = self.positional.as_ref().map_or(0, |values| {
            hash::ordered(values.iter().map(ParamValue::structural_hash))
        });
        let named = self.canonical_named.as_ref().map_or(0, named_hash);

        [
            hash::hash_str(&self.canonical_query),
            hash::hash_u32(self.first_row),
            hash::hash_u32(self.max_rows),
            hash::hash_bool(self.soft_deletion),
            hash::hash_bool(self.single_result),
            positional,
            named,
        ]
        .into_iter()
        .fold(hash::SEED, hash::mix)
    }

    fn equals_fields(&self, other: &Self) -> bool {
        self.canonical_query == other.canonical_query
            && self.first_row == other.first_row
            && self.max_rows == other.max_rows
            && self.soft_deletion == other.soft_deletion
            && self.single_result == other.single_result
    }

    /// `None` equals only `None`; present mappings must hold the same names
    /// bound to deeply equal values.
    fn equals_params(&self, other: &Self) -> bool {
        self.positional == other.positional && self.canonical_named == other.canonical_named
    }
}

/// Sum of `hash(name) ^ hash(value)` over all entries, so iteration order
/// does not matter.
fn named_hash(map: &BTreeMap<String, ParamValue>) -> u64 {
    map.iter().fold(0u64, |acc, (name, value)| {
        acc.wrapping_add(hash::hash_str(name) ^ value.structural_hash())
    })
}

fn feed_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_be_bytes());
}

fn feed_str(hasher: &mut Sha256, s: &str) {
    feed_len(hasher, s.len());
    hasher.update(s.as_bytes());
}

/// Type-tagged, length-prefixed encoding of a value.
fn feed_value(hasher: &mut Sha256, value: &ParamValue) {
    feed_str(hasher, value.kind());
    match value {
        ParamValue::Null => {}
        ParamValue::Bool(b) => hasher.update([u8::from(*b)]),
        ParamValue::Int(i) => hasher.update(i.to_be_bytes()),
        ParamValue::Float(f) => hasher.update(f.to_bits().to_be_bytes()),
        ParamValue::String(s) => feed_str(hasher, s),
        ParamValue::Uuid(u) => hasher.update(u.as_bytes()),
        ParamValue::Timestamp(ts) => {
            hasher.update(ts.timestamp().to_be_bytes());
            hasher.update(ts.timestamp_subsec_nanos().to_be_bytes());
        }
        ParamValue::Bytes(b) => {
            feed_len(hasher, b.len());
            hasher.update(b);
        }
        ParamValue::Vector(v) => {
            feed_len(hasher, v.len());
            for x in v {
                hasher.update(x.to_bits().to_be_bytes());
            }
        }
        ParamValue::Array(items) => {
            feed_len(hasher, items.len());
            for item in items {
                feed_value(hasher, item);
            }
        }
    }
}

impl PartialEq for QueryKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.equals_fields(other) && self.equals_params(other)
    }
}

impl Eq for QueryKey {}

impl Hash for QueryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<KeyParts> for QueryKey {
    fn from(parts: KeyParts) -> Self {
        QueryKey::new(parts)
    }
}

impl From<QueryKey> for KeyParts {
    fn from(key: QueryKey) -> Self {
        KeyParts {
            query_text: key.original_query,
            first_row: key.first_row,
            max_rows: key.max_rows,
            soft_deletion: key.soft_deletion,
            single_result: key.single_result,
            named: key.original_named,
            positional: key.positional,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
