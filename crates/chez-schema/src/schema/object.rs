//! Object schema variant
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use super::{Additional, Metadata, Pattern, Schema};
use std::collections::{BTreeMap, BTreeSet};

/// Constraints for JSON objects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: BTreeMap<String, Schema>,
    pub required: BTreeSet<String>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    pub additional_properties: Additional,
    pub pattern_properties: BTreeMap<Pattern, Schema>,
    pub property_names: Option<Box<Schema>>,
    /// When the key is present, every listed name must be present too
    pub dependent_required: BTreeMap<String, BTreeSet<String>>,
    /// When the key is present, the whole object must match the schema
    pub dependent_schemas: BTreeMap<String, Schema>,
    pub unevaluated_properties: Option<Additional>,
    pub metadata: Metadata,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.properties.insert(name.into(), schema.into());
        self
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.insert(name.into());
        self
    }

    /// Declare a property and mark it required in one step
    pub fn required_property(self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        let name = name.into();
        self.property(name.clone(), schema).required(name)
    }

    pub fn min_properties(mut self, min: usize) -> Self {
        self.min_properties = Some(min);
        self
    }

    pub fn max_properties(mut self, max: usize) -> Self {
        self.max_properties = Some(max);
        self
    }

    pub fn additional_properties(mut self, policy: Additional) -> Self {
        self.additional_properties = policy;
        self
    }

    /// Shorthand for `additionalProperties: false`
    pub fn deny_additional(self) -> Self {
        self.additional_properties(Additional::Disallowed)
    }

    pub fn pattern_property(mut self, pattern: Pattern, schema: impl Into<Schema>) -> Self {
        self.pattern_properties.insert(pattern, schema.into());
        self
    }

    pub fn property_names(mut self, schema: impl Into<Schema>) -> Self {
        self.property_names = Some(Box::new(schema.into()));
        self
    }

    pub fn dependent_required<I, S>(mut self, trigger: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependent_required
            .entry(trigger.into())
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn dependent_schema(
        mut self,
        trigger: impl Into<String>,
        schema: impl Into<Schema>,
    ) -> Self {
        self.dependent_schemas.insert(trigger.into(), schema.into());
        self
    }

    pub fn unevaluated_properties(mut self, policy: Additional) -> Self {
        self.unevaluated_properties = Some(policy);
        self
    }

    /// Patterns matching a property name, in pattern order
    pub fn matching_patterns<'s>(
        &'s self,
        name: &'s str,
    ) -> impl Iterator<Item = (&'s Pattern, &'s Schema)> + 's {
        self.pattern_properties
            .iter()
            .filter(move |(pattern, _)| pattern.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_property_registers_both() {
        let schema = ObjectSchema::new().required_property("id", Schema::integer());
        assert!(schema.properties.contains_key("id"));
        assert!(schema.required.contains("id"));
    }

    #[test]
    fn test_dependent_required_accumulates() {
        let schema = ObjectSchema::new()
            .dependent_required("card", ["billing"])
            .dependent_required("card", ["cvv"]);
        let names: Vec<_> = schema.dependent_required["card"].iter().cloned().collect();
        assert_eq!(names, vec!["billing".to_string(), "cvv".to_string()]);
    }

    #[test]
    fn test_matching_patterns() {
        let schema = ObjectSchema::new()
            .pattern_property(Pattern::new("^x-").unwrap(), Schema::string())
            .pattern_property(Pattern::new("^x-int").unwrap(), Schema::integer());
        assert_eq!(schema.matching_patterns("x-internal").count(), 2);
        assert_eq!(schema.matching_patterns("x-other").count(), 1);
        assert_eq!(schema.matching_patterns("name").count(), 0);
    }
}
