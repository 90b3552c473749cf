// SPDX-License-Identifier: PMPL-1.0-or-later
//! Key construction error types.

use thiserror::Error;

/// Errors that can occur while building a [`QueryKey`](crate::QueryKey).
///
/// Comparison and hashing never fail; every variant here aborts construction
/// before a partially built key can escape.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("query text is missing")]
    MissingQueryText,

    #[error("invalid parameter position {position}: positions run from 1 to {max}")]
    InvalidPosition { position: u32, max: u32 },

    #[error("cannot allocate positional parameter slots: {0}")]
    Allocation(#[from] std::collections::TryReserveError),

    #[error("parameter {parameter} unavailable: {reason}")]
    ParameterUnavailable { parameter: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_text_display() {
        assert_eq!(KeyError::MissingQueryText.to_string(), "query text is missing");
    }

    #[test]
    fn test_invalid_position_display() {
        let err = KeyError::InvalidPosition { position: 0, max: 65_535 };
        assert_eq!(
            err.to_string(),
            "invalid parameter position 0: positions run from 1 to 65535"
        );
    }

    #[test]
    fn test_parameter_unavailable_display() {
        let err = KeyError::ParameterUnavailable {
            parameter: ":status".to_string(),
            reason: "not bound".to_string(),
        };
        assert_eq!(err.to_string(), "parameter :status unavailable: not bound");
    }
}
