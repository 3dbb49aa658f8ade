//! Array schema variant
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use super::{Additional, Metadata, Schema};

/// Constraints for JSON arrays
///
/// Element `i` is validated against `prefix_items[i]` when that tuple
/// position exists, otherwise against `items`. An absent `items` accepts any
/// element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    pub items: Option<Box<Schema>>,
    pub prefix_items: Vec<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
    pub contains: Option<Box<Schema>>,
    /// Defaults to 1 when `contains` is present
    pub min_contains: Option<usize>,
    pub max_contains: Option<usize>,
    pub unevaluated_items: Option<Additional>,
    pub metadata: Metadata,
}

impl ArraySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(mut self, items: impl Into<Schema>) -> Self {
        self.items = Some(Box::new(items.into()));
        self
    }

    /// Append a tuple position
    pub fn prefix_item(mut self, schema: impl Into<Schema>) -> Self {
        self.prefix_items.push(schema.into());
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn unique_items(mut self, unique: bool) -> Self {
        self.unique_items = unique;
        self
    }

    pub fn contains(mut self, schema: impl Into<Schema>) -> Self {
        self.contains = Some(Box::new(schema.into()));
        self
    }

    pub fn min_contains(mut self, min: usize) -> Self {
        self.min_contains = Some(min);
        self
    }

    pub fn max_contains(mut self, max: usize) -> Self {
        self.max_contains = Some(max);
        self
    }

    pub fn unevaluated_items(mut self, policy: Additional) -> Self {
        self.unevaluated_items = Some(policy);
        self
    }

    /// Schema governing element `index`, if any
    pub fn schema_for_index(&self, index: usize) -> Option<&Schema> {
        self.prefix_items
            .get(index)
            .or_else(|| self.items.as_deref())
    }
}
