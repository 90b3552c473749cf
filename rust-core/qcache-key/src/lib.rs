// SPDX-License-Identifier: PMPL-1.0-or-later
//! QCache Key
//!
//! Cache keys for a second-level query result cache.
//! Normalizes parameterized queries (placeholder names, binding order,
//! array-valued bindings) so that logically identical executions share one
//! cached result set and everything else stays apart.
//!
//! # Example
//!
//! ```rust
//! use qcache_key::{BoundQuery, ParamValue, QueryKeyBuilder};
//!
//! let builder = QueryKeyBuilder::default();
//!
//! let a = BoundQuery::new("select o from Order o where o.status = :status and o.id in :ids")
//!     .bind_named("status", "OPEN")
//!     .bind_named("ids", vec![ParamValue::Int(1), ParamValue::Int(2)]);
//! let b = BoundQuery::new("select o from Order o where o.status = :s and o.id in :orderIds")
//!     .bind_named("orderIds", vec![ParamValue::Int(1), ParamValue::Int(2)])
//!     .bind_named("s", "OPEN");
//!
//! let key_a = builder.build_from_source(&a, true, false).unwrap();
//! let key_b = builder.build_from_source(&b, true, false).unwrap();
//! assert_eq!(key_a, key_b);
//! ```

pub mod builder;
pub mod canonical;
pub mod config;
pub mod error;
mod hash;
pub mod key;
pub mod source;
pub mod value;

pub use builder::QueryKeyBuilder;
pub use canonical::{canonicalize, Canonicalized, CANONICAL_PREFIX};
pub use config::{DescribeOptions, KeyConfig};
pub use error::KeyError;
pub use key::{KeyId, KeyParts, QueryKey};
pub use source::{BoundQuery, DeclaredParameter, ParameterSource};
pub use value::ParamValue;
