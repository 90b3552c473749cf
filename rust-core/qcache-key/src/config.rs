// SPDX-License-Identifier: PMPL-1.0-or-later
//! Key builder configuration.
//!
//! Nothing in here influences key identity: canonical text, hash, equality
//! and fingerprint are the same under every configuration. Options shape
//! diagnostics and bound how much a single source may ask the builder to
//! allocate.

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// How [`QueryKey::describe_with`](crate::QueryKey::describe_with) renders a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeOptions {
    /// Replace every bound value with `***` (for logs that may carry PII).
    pub redact_values: bool,
    /// Truncate the rendered query text to this many characters.
    pub max_query_len: Option<usize>,
}

/// Configuration for [`QueryKeyBuilder`](crate::QueryKeyBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Emit a `debug` event for every constructed key.
    pub trace_construction: bool,
    /// Highest positional parameter accepted. The positional array is sized
    /// to the highest declared position, so this caps its length.
    pub max_position: u32,
    /// Rendering used by the builder's own log events.
    pub describe: DescribeOptions,
}

impl KeyConfig {
    /// Reject settings that would make diagnostics useless.
    pub fn validate(&self) -> Result<(), KeyError> {
        if self.max_position == 0 {
            return Err(KeyError::InvalidConfig(
                "max_position must be greater than zero".to_string(),
            ));
        }
        if self.describe.max_query_len == Some(0) {
            return Err(KeyError::InvalidConfig(
                "describe.max_query_len must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for KeyConfig {
    /// Defaults:
    /// - trace_construction: true
    /// - max_position: 65535 (the bind parameter ceiling of common wire protocols)
    /// - describe: no redaction, no truncation
    fn default() -> Self {
        Self {
            trace_construction: true,
            max_position: 65_535,
            describe: DescribeOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KeyConfig::default();
        assert!(config.trace_construction);
        assert_eq!(config.max_position, 65_535);
        assert!(!config.describe.redact_values);
        assert_eq!(config.describe.max_query_len, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_truncation_rejected() {
        let config = KeyConfig {
            describe: DescribeOptions {
                max_query_len: Some(0),
                ..DescribeOptions::default()
            },
            ..KeyConfig::default()
        };
        assert!(matches!(config.validate(), Err(KeyError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_max_position_rejected() {
        let config = KeyConfig {
            max_position: 0,
            ..KeyConfig::default()
        };
        assert!(matches!(config.validate(), Err(KeyError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: KeyConfig =
            serde_json::from_str(r#"{"describe": {"redact_values": true}}"#).unwrap();
        assert!(config.trace_construction);
        assert_eq!(config.max_position, 65_535);
        assert!(config.describe.redact_values);
        assert_eq!(config.describe.max_query_len, None);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = KeyConfig {
            trace_construction: false,
            max_position: 128,
            describe: DescribeOptions {
                redact_values: true,
                max_query_len: Some(80),
            },
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: KeyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
