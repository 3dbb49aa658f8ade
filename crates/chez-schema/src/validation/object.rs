//! Object keywords
//!
//! Members are visited in schema order (properties sorted by name), so the
//! error sequence for a given schema and value is deterministic.
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::schema::{Additional, Composition, ObjectSchema, Schema};
use crate::validation::base::ValidationContext;
use crate::validation::error::ValidationError;
use crate::validation::validator::Validator;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

impl Validator<'_> {
    pub(super) fn check_object(
        &self,
        schema: &ObjectSchema,
        value: &Value,
        members: &Map<String, Value>,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        let count = members.len();
        if let Some(min) = schema.min_properties {
            if count < min {
                errors.push(ValidationError::MinPropertiesViolation {
                    path: context.path().to_string(),
                    min,
                    actual: count,
                });
            }
        }
        if let Some(max) = schema.max_properties {
            if count > max {
                errors.push(ValidationError::MaxPropertiesViolation {
                    path: context.path().to_string(),
                    max,
                    actual: count,
                });
            }
        }

        for name in &schema.required {
            if !members.contains_key(name) {
                errors.push(ValidationError::MissingField {
                    path: context.path().to_string(),
                    name: name.clone(),
                });
            }
        }

        for (trigger, names) in &schema.dependent_required {
            if !members.contains_key(trigger) {
                continue;
            }
            for name in names {
                if !members.contains_key(name) {
                    errors.push(ValidationError::DependencyViolation {
                        path: context.path().to_string(),
                        trigger: trigger.clone(),
                        missing: name.clone(),
                    });
                }
            }
        }

        for (name, property) in &schema.properties {
            if let Some(member) = members.get(name) {
                self.check(property, member, &context.with_property(name), errors);
            }
        }

        for (key, member) in members {
            if schema.properties.contains_key(key) {
                continue;
            }
            for (_, pattern_schema) in schema.matching_patterns(key) {
                self.check(pattern_schema, member, &context.with_property(key), errors);
            }
        }

        if !schema.additional_properties.is_allow_any() {
            for (key, member) in members {
                if is_declared(schema, key) {
                    continue;
                }
                match &schema.additional_properties {
                    Additional::AllowAny => {}
                    Additional::Disallowed => errors.push(ValidationError::AdditionalProperty {
                        path: context.path().to_string(),
                        name: key.clone(),
                    }),
                    Additional::Schema(extra) => {
                        self.check(extra, member, &context.with_property(key), errors)
                    }
                }
            }
        }

        if let Some(names_schema) = &schema.property_names {
            for key in members.keys() {
                self.check(
                    names_schema,
                    &Value::String(key.clone()),
                    &context.with_property(key),
                    errors,
                );
            }
        }

        let mut dependent_evaluated: BTreeSet<&str> = BTreeSet::new();
        for (trigger, dependent) in &schema.dependent_schemas {
            if !members.contains_key(trigger) {
                continue;
            }
            let dependent_errors = self.errors_for(dependent, value, context);
            if dependent_errors.is_empty() {
                self.evaluated_keys(dependent, members, &mut dependent_evaluated);
            }
            errors.extend(dependent_errors);
        }

        if let Some(policy) = &schema.unevaluated_properties {
            for (key, member) in members {
                let evaluated = is_declared(schema, key)
                    || !schema.additional_properties.is_allow_any()
                    || dependent_evaluated.contains(key.as_str());
                if evaluated {
                    continue;
                }
                match policy {
                    Additional::AllowAny => {}
                    Additional::Disallowed => errors.push(ValidationError::UnevaluatedProperty {
                        path: context.path().to_string(),
                        name: key.clone(),
                    }),
                    Additional::Schema(extra) => {
                        self.check(extra, member, &context.with_property(key), errors)
                    }
                }
            }
        }
    }

    /// Keys of `members` that `schema` evaluates when it applies in place
    ///
    /// Follows references and `allOf` branches; other combinators contribute
    /// nothing.
    fn evaluated_keys<'m>(
        &self,
        schema: &Schema,
        members: &'m Map<String, Value>,
        out: &mut BTreeSet<&'m str>,
    ) {
        match schema {
            Schema::Object(object) => {
                let covers_all =
                    !object.additional_properties.is_allow_any()
                        || object.unevaluated_properties.is_some();
                out.extend(
                    members
                        .keys()
                        .filter(|key| covers_all || is_declared(object, key))
                        .map(String::as_str),
                );
            }
            Schema::Ref(reference) => {
                if let Some(target) = self.resolved(&reference.pointer) {
                    self.evaluated_keys(target, members, out);
                }
            }
            Schema::Composition(composition) => {
                if let Composition::AllOf(branches) = &composition.composition {
                    for branch in branches {
                        self.evaluated_keys(branch, members, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Claimed by `properties` or `patternProperties`
fn is_declared(schema: &ObjectSchema, key: &str) -> bool {
    schema.properties.contains_key(key) || schema.matching_patterns(key).next().is_some()
}

#[cfg(test)]
mod tests {
    use crate::schema::{Additional, ObjectSchema, Pattern, Schema, StringSchema};
    use crate::validation::{ValidationError, Validator};
    use serde_json::{json, Value};

    fn errors(schema: &Schema, value: Value) -> Vec<ValidationError> {
        Validator::new(schema).unwrap().validate(&value).into_errors()
    }

    #[test]
    fn test_missing_fields_in_name_order() {
        let schema: Schema = ObjectSchema::new()
            .required_property("zeta", Schema::string())
            .required_property("alpha", Schema::string())
            .into();
        let names: Vec<String> = errors(&schema, json!({}))
            .into_iter()
            .filter_map(|error| match error {
                ValidationError::MissingField { name, .. } => Some(name),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_additional_properties_disallowed() {
        let schema: Schema = ObjectSchema::new()
            .property("a", Schema::integer())
            .deny_additional()
            .into();
        assert_eq!(
            errors(&schema, json!({"a": 1, "b": 2})),
            vec![ValidationError::AdditionalProperty {
                path: "/".to_string(),
                name: "b".to_string(),
            }]
        );
    }

    #[test]
    fn test_pattern_properties_claim_keys() {
        let schema: Schema = ObjectSchema::new()
            .pattern_property(Pattern::new("^x-").unwrap(), Schema::string())
            .additional_properties(Additional::schema(Schema::integer()))
            .into();
        assert!(errors(&schema, json!({"x-note": "hi", "count": 3})).is_empty());
        let errors = errors(&schema, json!({"x-note": 1, "count": "3"}));
        let paths: Vec<&str> = errors.iter().map(ValidationError::path).collect();
        assert_eq!(paths, vec!["/x-note", "/count"]);
    }

    #[test]
    fn test_property_names() {
        let schema: Schema = ObjectSchema::new()
            .property_names(StringSchema::new().max_length(3))
            .into();
        let errors = errors(&schema, json!({"ok": 1, "toolong": 2}));
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::MaxLengthViolation { path, max: 3, actual: 7 } if path == "/toolong"
        ));
    }

    #[test]
    fn test_dependent_required() {
        let schema: Schema = ObjectSchema::new()
            .dependent_required("card", ["billing_address"])
            .into();
        assert!(errors(&schema, json!({"name": "x"})).is_empty());
        assert_eq!(
            errors(&schema, json!({"card": "4111"})),
            vec![ValidationError::DependencyViolation {
                path: "/".to_string(),
                trigger: "card".to_string(),
                missing: "billing_address".to_string(),
            }]
        );
    }

    #[test]
    fn test_dependent_schemas_apply_to_whole_object() {
        let schema: Schema = ObjectSchema::new()
            .dependent_schema("card", ObjectSchema::new().required("cvv"))
            .into();
        assert!(errors(&schema, json!({"card": 1, "cvv": 2})).is_empty());
        assert!(matches!(
            &errors(&schema, json!({"card": 1}))[0],
            ValidationError::MissingField { name, .. } if name == "cvv"
        ));
    }

    #[test]
    fn test_unevaluated_properties_sees_dependent_schemas() {
        let schema: Schema = ObjectSchema::new()
            .property("card", Schema::string())
            .dependent_schema("card", ObjectSchema::new().property("cvv", Schema::string()))
            .unevaluated_properties(Additional::Disallowed)
            .into();
        assert!(errors(&schema, json!({"card": "1", "cvv": "2"})).is_empty());
        assert_eq!(
            errors(&schema, json!({"cvv": "2"})),
            vec![ValidationError::UnevaluatedProperty {
                path: "/".to_string(),
                name: "cvv".to_string(),
            }]
        );
    }

    #[test]
    fn test_escaped_property_paths() {
        let schema: Schema = ObjectSchema::new().property("a/b", Schema::integer()).into();
        assert_eq!(errors(&schema, json!({"a/b": "x"}))[0].path(), "/a~1b");
    }
}
