// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Parameter sources.
//!
//! The query execution pipeline hands the builder something implementing
//! [`ParameterSource`]: the raw template, pagination bounds, the declared
//! parameters and a way to read each bound value. [`BoundQuery`] is the
//! in-memory implementation used by callers that assemble queries by hand
//! (and by the tests).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::KeyError;
use crate::value::ParamValue;

/// A parameter declared by a query: named, positioned (1-based), both, or
/// neither. Declarations with neither contribute nothing to a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredParameter {
    pub name: Option<String>,
    pub position: Option<u32>,
}

impl DeclaredParameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            position: None,
        }
    }

    pub fn positional(position: u32) -> Self {
        Self {
            name: None,
            position: Some(position),
        }
    }

    /// A declaration carrying no usable metadata.
    pub fn anonymous() -> Self {
        Self {
            name: None,
            position: None,
        }
    }
}

/// Everything the key builder needs from a query about to be executed.
pub trait ParameterSource {
    /// Raw query template; `None` if the query has no text.
    fn query_text(&self) -> Option<&str>;

    /// Index of the first row to return.
    fn first_row(&self) -> u32;

    /// Maximum number of rows to return.
    fn max_rows(&self) -> u32;

    /// Declared parameters, or `None` when the source exposes no parameter
    /// metadata at all.
    fn declared_parameters(&self) -> Option<Vec<DeclaredParameter>>;

    /// Value bound to a named parameter.
    ///
    /// An `Err` means the source is broken and aborts key construction; an
    /// unbound parameter should read as [`ParamValue::Null`].
    fn value_by_name(&self, name: &str) -> Result<ParamValue, KeyError>;

    /// Value bound to a 1-based position. Same error contract as
    /// [`value_by_name`](Self::value_by_name).
    fn value_by_position(&self, position: u32) -> Result<ParamValue, KeyError>;
}

/// An in-memory query description.
///
/// `bind_*` declares and binds in one step; [`declare`](Self::declare) adds a
/// declaration without a value, which then reads as `Null`.
///
/// # Example
///
/// ```rust
/// use qcache_key::source::{BoundQuery, ParameterSource};
///
/// let query = BoundQuery::new("select o from Order o where o.status = :status")
///     .bind_named("status", "OPEN")
///     .with_max_rows(50);
///
/// assert_eq!(query.max_rows(), 50);
/// assert_eq!(query.declared_parameters().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundQuery {
    query_text: Option<String>,
    first_row: u32,
    max_rows: u32,
    declared: Vec<DeclaredParameter>,
    named: HashMap<String, ParamValue>,
    positional: BTreeMap<u32, ParamValue>,
}

impl BoundQuery {
    /// A query over `text` with no bindings, starting at row 0 with no row limit.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            query_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A query without template text. Building a key from it fails.
    pub fn without_text() -> Self {
        Self::default()
    }

    pub fn with_first_row(mut self, first_row: u32) -> Self {
        self.first_row = first_row;
        self
    }

    pub fn with_max_rows(mut self, max_rows: u32) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn bind_named(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let name = name.into();
        self.declared.push(DeclaredParameter::named(name.clone()));
        self.named.insert(name, value.into());
        self
    }

    pub fn bind_positional(mut self, position: u32, value: impl Into<ParamValue>) -> Self {
        self.declared.push(DeclaredParameter::positional(position));
        self.positional.insert(position, value.into());
        self
    }

    pub fn declare(mut self, parameter: DeclaredParameter) -> Self {
        self.declared.push(parameter);
        self
    }
}

impl Default for BoundQuery {
    fn default() -> Self {
        Self {
            query_text: None,
            first_row: 0,
            max_rows: u32::MAX,
            declared: Vec::new(),
            named: HashMap::new(),
            positional: BTreeMap::new(),
        }
    }
}

impl ParameterSource for BoundQuery {
    fn query_text(&self) -> Option<&str> {
        self.query_text.as_deref()
    }

    fn first_row(&self) -> u32 {
        self.first_row
    }

    fn max_rows(&self) -> u32 {
        self.max_rows
    }

    fn declared_parameters(&self) -> Option<Vec<DeclaredParameter>> {
        Some(self.declared.clone())
    }

    fn value_by_name(&self, name: &str) -> Result<ParamValue, KeyError> {
        Ok(self.named.get(name).cloned().unwrap_or(ParamValue::Null))
    }

    fn value_by_position(&self, position: u32) -> Result<ParamValue, KeyError> {
        Ok(self
            .positional
            .get(&position)
            .cloned()
            .unwrap_or(ParamValue::Null))
    }
}
