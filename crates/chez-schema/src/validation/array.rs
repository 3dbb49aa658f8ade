//! Array keywords
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::schema::{Additional, ArraySchema};
use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::ValidationError;
use crate::validation::validator::Validator;
use serde_json::Value;

impl Validator<'_> {
    /// minItems, maxItems, uniqueItems, prefixItems/items, contains,
    /// unevaluatedItems
    pub(super) fn check_array(
        &self,
        schema: &ArraySchema,
        items: &[Value],
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        let count = items.len();
        if let Some(min) = schema.min_items {
            if count < min {
                errors.push(ValidationError::MinItemsViolation {
                    path: context.path().to_string(),
                    min,
                    actual: count,
                });
            }
        }
        if let Some(max) = schema.max_items {
            if count > max {
                errors.push(ValidationError::MaxItemsViolation {
                    path: context.path().to_string(),
                    max,
                    actual: count,
                });
            }
        }
        if schema.unique_items {
            if let Some((first, duplicate)) = ValidationHelpers::find_duplicate(items) {
                errors.push(ValidationError::UniqueViolation {
                    path: context.path().to_string(),
                    first,
                    duplicate,
                });
            }
        }

        for (index, item) in items.iter().enumerate() {
            if let Some(item_schema) = schema.schema_for_index(index) {
                self.check(item_schema, item, &context.with_index(index), errors);
            }
        }

        let mut contained = Vec::new();
        if let Some(contains) = &schema.contains {
            contained = items
                .iter()
                .enumerate()
                .filter(|(index, item)| self.passes(contains, item, &context.with_index(*index)))
                .map(|(index, _)| index)
                .collect();
            let min = schema.min_contains.unwrap_or(1);
            let matched = contained.len();
            if matched < min || schema.max_contains.is_some_and(|max| matched > max) {
                errors.push(ValidationError::ContainsViolation {
                    path: context.path().to_string(),
                    min,
                    max: schema.max_contains,
                    actual: matched,
                });
            }
        }

        if let Some(policy) = &schema.unevaluated_items {
            for (index, item) in items.iter().enumerate() {
                let evaluated = schema.schema_for_index(index).is_some()
                    || contained.binary_search(&index).is_ok();
                if !evaluated {
                    self.check_unevaluated_item(policy, index, item, context, errors);
                }
            }
        }
    }

    fn check_unevaluated_item(
        &self,
        policy: &Additional,
        index: usize,
        item: &Value,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        match policy {
            Additional::AllowAny => {}
            Additional::Disallowed => errors.push(ValidationError::UnevaluatedItem {
                path: context.path().to_string(),
                index,
            }),
            Additional::Schema(schema) => {
                self.check(schema, item, &context.with_index(index), errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Additional, ArraySchema, NumericSchema, Schema};
    use crate::validation::{ValidationError, Validator};
    use serde_json::{json, Value};

    fn errors(schema: &Schema, value: Value) -> Vec<ValidationError> {
        Validator::new(schema).unwrap().validate(&value).into_errors()
    }

    #[test]
    fn test_item_errors_carry_index_paths() {
        let schema = Schema::array_of(Schema::integer());
        let errors = errors(&schema, json!([1, "two", 3, null]));
        let paths: Vec<&str> = errors.iter().map(ValidationError::path).collect();
        assert_eq!(paths, vec!["/1", "/3"]);
    }

    #[test]
    fn test_prefix_items_then_items() {
        let schema: Schema = ArraySchema::new()
            .prefix_item(Schema::string())
            .prefix_item(Schema::integer())
            .items(Schema::boolean())
            .into();
        assert!(errors(&schema, json!(["a", 1, true, false])).is_empty());
        assert!(errors(&schema, json!(["a"])).is_empty());
        assert_eq!(errors(&schema, json!([1, 1, 1]))[0].path(), "/0");
    }

    #[test]
    fn test_unique_items_reports_first_pair() {
        let schema: Schema = ArraySchema::new().unique_items(true).into();
        assert_eq!(
            errors(&schema, json!([1, 2, 1.0, 2])),
            vec![ValidationError::UniqueViolation {
                path: "/".to_string(),
                first: 0,
                duplicate: 2,
            }]
        );
    }

    #[test]
    fn test_contains_bounds() {
        let positive = NumericSchema::new().exclusive_minimum(0).integer();
        let schema: Schema = ArraySchema::new()
            .contains(positive)
            .min_contains(2)
            .max_contains(3)
            .into();
        assert!(errors(&schema, json!([1, -1, 2])).is_empty());
        assert_eq!(
            errors(&schema, json!([1, -1])),
            vec![ValidationError::ContainsViolation {
                path: "/".to_string(),
                min: 2,
                max: Some(3),
                actual: 1,
            }]
        );
        assert_eq!(errors(&schema, json!([1, 2, 3, 4])).len(), 1);
    }

    #[test]
    fn test_contains_defaults_to_one() {
        let schema: Schema = ArraySchema::new().contains(Schema::null()).into();
        assert_eq!(errors(&schema, json!([])).len(), 1);
        assert!(errors(&schema, json!([1, null])).is_empty());
    }

    #[test]
    fn test_unevaluated_items_respects_prefix_and_contains() {
        let schema: Schema = ArraySchema::new()
            .prefix_item(Schema::string())
            .contains(Schema::null())
            .unevaluated_items(Additional::Disallowed)
            .into();
        assert!(errors(&schema, json!(["a", null])).is_empty());
        assert_eq!(
            errors(&schema, json!(["a", null, 5])),
            vec![ValidationError::UnevaluatedItem {
                path: "/".to_string(),
                index: 2,
            }]
        );
    }
}
