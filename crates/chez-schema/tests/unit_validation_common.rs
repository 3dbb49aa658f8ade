//! Common unit tests for validation behavior
//!
//! Covers required fields, error aggregation and ordering, path accuracy,
//! and the numeric, array and format edge cases shared by every schema.

use chez_schema::{
    validate, ArraySchema, FormatRegistry, JsonType, NumericSchema, ObjectSchema, RangeKind,
    Schema, StringSchema, ValidationContext, ValidationError, ValidationOptions, ValidationResult,
    Validator,
};
use serde_json::{json, Value};

fn check(schema: &Schema, value: &Value) -> ValidationResult {
    validate(schema, value, &ValidationContext::new()).unwrap()
}

fn paths(result: &ValidationResult) -> Vec<&str> {
    result.errors().iter().map(|e| e.path()).collect()
}

#[cfg(test)]
mod required_field_validation {
    use super::*;

    #[test]
    fn test_missing_required_field_is_reported_at_parent() {
        let schema: Schema = ObjectSchema::new()
            .property("name", StringSchema::new().min_length(1))
            .required("name")
            .into();

        let result = check(&schema, &json!({}));
        assert_eq!(
            result.errors(),
            &[ValidationError::MissingField {
                path: "/".to_string(),
                name: "name".to_string(),
            }]
        );
    }

    #[test]
    fn test_all_required_fields_present() {
        let schema: Schema = ObjectSchema::new()
            .required_property("id", Schema::integer())
            .required_property("email", StringSchema::new().format("email"))
            .into();

        let result = check(&schema, &json!({"id": 7, "email": "ada@example.com"}));
        assert!(result.is_valid(), "unexpected errors: {:?}", result);
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let schema: Schema = ObjectSchema::new()
            .required("a")
            .required("b")
            .required("c")
            .into();

        let result = check(&schema, &json!({"b": null}));
        let missing: Vec<_> = result
            .errors()
            .iter()
            .filter_map(|e| match e {
                ValidationError::MissingField { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec!["a", "c"]);
    }
}

#[cfg(test)]
mod path_accuracy {
    use super::*;

    #[test]
    fn test_nested_property_path() {
        let schema: Schema = ObjectSchema::new()
            .property(
                "address",
                ObjectSchema::new().property("street", StringSchema::new().min_length(1)),
            )
            .into();

        let result = check(&schema, &json!({"address": {"street": ""}}));
        assert_eq!(paths(&result), vec!["/address/street"]);
        assert!(matches!(
            result.errors()[0],
            ValidationError::MinLengthViolation { min: 1, actual: 0, .. }
        ));
    }

    #[test]
    fn test_array_index_path() {
        let schema: Schema = ObjectSchema::new()
            .property("tags", ArraySchema::new().items(StringSchema::new().max_length(3)))
            .into();

        let result = check(&schema, &json!({"tags": ["ok", "too long", "no"]}));
        assert_eq!(paths(&result), vec!["/tags/1"]);
    }

    #[test]
    fn test_escaped_property_names() {
        let schema: Schema = ObjectSchema::new()
            .property("a/b", Schema::integer())
            .property("c~d", Schema::integer())
            .into();

        let result = check(&schema, &json!({"a/b": "x", "c~d": "y"}));
        assert_eq!(paths(&result), vec!["/a~1b", "/c~0d"]);
    }

    #[test]
    fn test_context_prefix_is_respected() {
        let schema = Schema::integer();
        let context = ValidationContext::at("/payload");
        let result = validate(&schema, &json!("x"), &context).unwrap();
        assert_eq!(paths(&result), vec!["/payload"]);
    }
}

#[cfg(test)]
mod error_aggregation {
    use super::*;

    #[test]
    fn test_errors_follow_check_order() {
        let schema: Schema = ObjectSchema::new()
            .property("name", StringSchema::new().min_length(2))
            .property("age", NumericSchema::new().minimum(0).integer())
            .required("id")
            .into();

        let result = check(&schema, &json!({"name": "a", "age": -1}));
        let kinds: Vec<_> = result.errors().iter().map(|e| e.kind()).collect();
        // required is checked before properties; properties iterate by name
        assert_eq!(
            kinds,
            vec!["missing_field", "out_of_range", "min_length_violation"]
        );
        assert_eq!(paths(&result), vec!["/", "/age", "/name"]);
    }

    #[test]
    fn test_type_mismatch_skips_other_keywords() {
        let schema: Schema = StringSchema::new().min_length(5).into();
        let result = check(&schema, &json!(42));
        assert_eq!(
            result.errors(),
            &[ValidationError::TypeMismatch {
                path: "/".to_string(),
                expected: JsonType::String,
                actual: JsonType::Integer,
            }]
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let schema = Schema::from_json_schema(&json!({
            "type": "object",
            "properties": {
                "z": {"type": "string"},
                "a": {"type": "string"},
                "m": {"type": "string"}
            },
            "additionalProperties": false
        }))
        .unwrap();
        let value = json!({"z": 1, "a": 2, "m": 3, "extra": true});

        let first = check(&schema, &value);
        let second = check(&schema, &value);
        assert_eq!(first, second);
        assert_eq!(first.errors().len(), 4);
    }
}

#[cfg(test)]
mod numeric_validation {
    use super::*;

    #[test]
    fn test_integer_out_of_range_reports_bound() {
        let schema = NumericSchema::new().minimum(0).maximum(25).integer();
        let result = check(&schema, &json!(-5));

        match &result.errors()[0] {
            ValidationError::OutOfRange { kind, bound, actual, .. } => {
                assert_eq!(*kind, RangeKind::Minimum);
                assert_eq!(bound.as_i64(), Some(0));
                assert_eq!(actual.as_i64(), Some(-5));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_integral_float_is_an_integer() {
        let schema = Schema::integer();
        assert!(check(&schema, &json!(1.0)).is_valid());
        assert!(check(&schema, &json!(1.5)).is_invalid());
    }

    #[test]
    fn test_exclusive_bounds() {
        let schema = NumericSchema::new()
            .exclusive_minimum(0)
            .exclusive_maximum(10)
            .number();
        assert!(check(&schema, &json!(0)).is_invalid());
        assert!(check(&schema, &json!(0.5)).is_valid());
        assert!(check(&schema, &json!(10)).is_invalid());
    }

    #[test]
    fn test_fractional_multiple_of() {
        let schema = NumericSchema::new().multiple_of_f64(0.1).number();
        assert!(check(&schema, &json!(0.3)).is_valid());
        assert!(check(&schema, &json!(0.35)).is_invalid());
    }
}

#[cfg(test)]
mod array_validation {
    use super::*;

    #[test]
    fn test_duplicate_items() {
        let schema: Schema = ArraySchema::new()
            .items(StringSchema::new())
            .unique_items(true)
            .into();

        let result = check(&schema, &json!(["a", "a"]));
        assert_eq!(result.errors().len(), 1);
        assert!(matches!(
            &result.errors()[0],
            ValidationError::UniqueViolation { path, .. } if path == "/"
        ));
    }

    #[test]
    fn test_unique_items_uses_numeric_equality() {
        let schema: Schema = ArraySchema::new().unique_items(true).into();
        assert!(check(&schema, &json!([1, 1.0])).is_invalid());
        assert!(check(&schema, &json!([{"a": 1}, {"a": 2}])).is_valid());
    }

    #[test]
    fn test_empty_array_meets_zero_min_items() {
        let schema: Schema = ArraySchema::new().min_items(0).into();
        assert!(check(&schema, &json!([])).is_valid());
    }

    #[test]
    fn test_contains_bounds() {
        let schema: Schema = ArraySchema::new()
            .contains(Schema::integer())
            .min_contains(2)
            .max_contains(3)
            .into();

        assert!(check(&schema, &json!(["a", 1])).is_invalid());
        assert!(check(&schema, &json!([1, "a", 2])).is_valid());
        assert!(check(&schema, &json!([1, 2, 3, 4])).is_invalid());
    }
}

#[cfg(test)]
mod format_validation {
    use super::*;

    fn email_schema() -> Schema {
        StringSchema::new().format("email").into()
    }

    #[test]
    fn test_known_format_is_asserted() {
        let result = check(&email_schema(), &json!("not an email"));
        assert!(matches!(
            &result.errors()[0],
            ValidationError::InvalidFormat { format, .. } if format == "email"
        ));
    }

    #[test]
    fn test_format_assertions_can_be_disabled() {
        let schema = email_schema();
        let validator = Validator::new(&schema)
            .unwrap()
            .with_options(ValidationOptions::new().without_format_assertions());
        assert!(validator.is_valid(&json!("not an email")));
    }

    #[test]
    fn test_unknown_format_is_ignored() {
        let schema: Schema = StringSchema::new().format("x-custom").into();
        assert!(check(&schema, &json!("anything")).is_valid());
    }

    #[test]
    fn test_custom_format_checker() {
        fn is_upper(text: &str) -> bool {
            text.chars().all(|c| c.is_ascii_uppercase())
        }

        let schema: Schema = StringSchema::new().format("upper").into();
        let formats = FormatRegistry::new().with("upper", is_upper);
        let validator = Validator::new(&schema)
            .unwrap()
            .with_options(ValidationOptions::new().with_formats(formats));

        assert!(validator.is_valid(&json!("ABC")));
        assert!(!validator.is_valid(&json!("AbC")));
    }

    #[test]
    fn test_length_counts_characters() {
        let schema: Schema = StringSchema::new().max_length(2).into();
        assert!(check(&schema, &json!("日本")).is_valid());
    }
}
