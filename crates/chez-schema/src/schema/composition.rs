//! Composition and reference schema variants
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use super::{Metadata, Schema};

/// A combinator over sub-schemas
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    AnyOf(Vec<Schema>),
    OneOf(Vec<Schema>),
    AllOf(Vec<Schema>),
    Not(Box<Schema>),
    IfThenElse {
        condition: Box<Schema>,
        then: Option<Box<Schema>>,
        otherwise: Option<Box<Schema>>,
    },
}

impl Composition {
    /// The JSON Schema keyword introducing this combinator
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::AnyOf(_) => "anyOf",
            Self::OneOf(_) => "oneOf",
            Self::AllOf(_) => "allOf",
            Self::Not(_) => "not",
            Self::IfThenElse { .. } => "if",
        }
    }

    /// All direct sub-schemas, in keyword order
    pub fn subschemas(&self) -> Vec<&Schema> {
        match self {
            Self::AnyOf(branches) | Self::OneOf(branches) | Self::AllOf(branches) => {
                branches.iter().collect()
            }
            Self::Not(inner) => vec![inner.as_ref()],
            Self::IfThenElse {
                condition,
                then,
                otherwise,
            } => std::iter::once(condition.as_ref())
                .chain(then.as_deref())
                .chain(otherwise.as_deref())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositionSchema {
    pub composition: Composition,
    pub metadata: Metadata,
}

impl CompositionSchema {
    pub fn new(composition: Composition) -> Self {
        Self {
            composition,
            metadata: Metadata::default(),
        }
    }
}

/// A deferred `$ref` to another schema
#[derive(Debug, Clone, PartialEq)]
pub struct RefSchema {
    /// Pointer such as `#/$defs/User` or `#`
    pub pointer: String,
    pub metadata: Metadata,
}

impl RefSchema {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            metadata: Metadata::default(),
        }
    }
}
