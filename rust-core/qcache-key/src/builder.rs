// SPDX-License-Identifier: PMPL-1.0-or-later
//! Key builder — turns a parameter source into a [`QueryKey`].

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::KeyConfig;
use crate::error::KeyError;
use crate::key::{KeyParts, QueryKey};
use crate::source::ParameterSource;
use crate::value::ParamValue;

/// Builds cache keys for queries about to be executed.
///
/// The builder holds only its configuration, so one instance can be shared
/// freely between threads.
///
/// 1. Collect named bindings (distinct, non-empty names, sorted)
/// 2. Collect positional bindings into a dense array
/// 3. Canonicalize the template and compute the hash
#[derive(Debug, Clone, Default)]
pub struct QueryKeyBuilder {
    config: KeyConfig,
}

impl QueryKeyBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: KeyConfig) -> Result<Self, KeyError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    /// Build a key for `query_text` using bindings and pagination from `source`.
    pub fn build<S>(
        &self,
        query_text: &str,
        soft_deletion: bool,
        single_result: bool,
        source: &S,
    ) -> Result<QueryKey, KeyError>
    where
        S: ParameterSource + ?Sized,
    {
        let named = named_parameters(source)?;
        let positional = positional_parameters(source, self.config.max_position)?;

        let key = QueryKey::new(KeyParts {
            query_text: query_text.to_string(),
            first_row: source.first_row(),
            max_rows: source.max_rows(),
            soft_deletion,
            single_result,
            named,
            positional,
        });

        if self.config.trace_construction {
            debug!(
                key_id = %key.id(),
                hash = key.precomputed_hash(),
                named = key.named_parameters().map_or(0, BTreeMap::len),
                positional = key.positional_parameters().map_or(0, <[ParamValue]>::len),
                key = %key.describe_with(&self.config.describe),
                "Built query key"
            );
        }

        Ok(key)
    }

    /// Like [`build`](Self::build), taking the template from the source itself.
    pub fn build_from_source<S>(
        &self,
        source: &S,
        soft_deletion: bool,
        single_result: bool,
    ) -> Result<QueryKey, KeyError>
    where
        S: ParameterSource + ?Sized,
    {
        let query_text = source.query_text().ok_or(KeyError::MissingQueryText)?;
        self.build(query_text, soft_deletion, single_result, source)
    }
}

/// Named bindings of `source`, sorted by name.
///
/// Declarations without a name (or with an empty one) are skipped. Returns
/// `None` when nothing named is declared.
pub fn named_parameters<S>(source: &S) -> Result<Option<BTreeMap<String, ParamValue>>, KeyError>
where
    S: ParameterSource + ?Sized,
{
    let Some(declared) = source.declared_parameters() else {
        return Ok(None);
    };

    let mut named = BTreeMap::new();
    for name in declared
        .iter()
        .filter_map(|p| p.name.as_deref())
        .filter(|name| !name.is_empty())
    {
        if !named.contains_key(name) {
            named.insert(name.to_string(), source.value_by_name(name)?);
        }
    }

    Ok((!named.is_empty()).then_some(named))
}

/// Positional bindings of `source` as a dense array sized to the highest
/// declared position. Slot `i` holds position `i + 1`; undeclared slots are
/// `Null`. Returns `None` when no position is declared.
///
/// Every position must lie in `1..=max_position`.
pub fn positional_parameters<S>(
    source: &S,
    max_position: u32,
) -> Result<Option<Vec<ParamValue>>, KeyError>
where
    S: ParameterSource + ?Sized,
{
    let Some(declared) = source.declared_parameters() else {
        return Ok(None);
    };

    let positions: Vec<u32> = declared.iter().filter_map(|p| p.position).collect();
    if let Some(&position) = positions
        .iter()
        .find(|&&p| p == 0 || p > max_position)
    {
        return Err(KeyError::InvalidPosition {
            position,
            max: max_position,
        });
    }
    let Some(&highest) = positions.iter().max() else {
        return Ok(None);
    };

    let mut values = Vec::new();
    values.try_reserve_exact(highest as usize)?;
    values.resize(highest as usize, ParamValue::Null);
    for position in positions {
        values[position as usize - 1] = source.value_by_position(position)?;
    }

    Ok(Some(values))
}
