//! Configuration errors raised while building, parsing or preparing a schema
//!
//! These are distinct from validation failures: a `SchemaError` means the
//! schema itself cannot be used, and it is always reported before any
//! instance is validated.
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Result type for schema construction and preparation
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that make a schema unusable for validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A `pattern` or `patternProperties` key is not a valid regular expression
    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A `$ref` pointer could not be resolved by the configured resolver
    #[error("Unresolved reference '{pointer}'")]
    UnresolvedReference { pointer: String },

    /// A chain of `$ref`s loops back on itself without descending into the instance
    #[error("Circular reference detected: {chain}")]
    CircularReference { chain: String },

    /// A keyword carries a value of the wrong shape
    #[error("Invalid keyword '{keyword}' at '{path}': {reason}")]
    InvalidKeyword {
        path: String,
        keyword: String,
        reason: String,
    },

    /// A schema document uses a construct this engine cannot represent
    #[error("Unsupported schema at '{path}': {reason}")]
    UnsupportedSchema { path: String, reason: String },
}

impl SchemaError {
    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an unresolved reference error
    pub fn unresolved_reference(pointer: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            pointer: pointer.into(),
        }
    }

    /// Create a circular reference error from the pointers forming the loop
    pub fn circular_reference<S: AsRef<str>>(chain: &[S]) -> Self {
        let chain = chain
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(" -> ");
        Self::CircularReference { chain }
    }

    /// Create an invalid keyword error
    pub fn invalid_keyword(
        path: impl Into<String>,
        keyword: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidKeyword {
            path: path.into(),
            keyword: keyword.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported schema error
    pub fn unsupported(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error concerns `$ref` resolution
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedReference { .. } | Self::CircularReference { .. }
        )
    }
}
