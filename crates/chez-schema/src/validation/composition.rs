//! Composition keywords: allOf, anyOf, oneOf, not, if/then/else
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::schema::Composition;
use crate::validation::base::ValidationContext;
use crate::validation::error::{CompositionDetail, CompositionKind, ValidationError};
use crate::validation::validator::Validator;
use serde_json::Value;

impl Validator<'_> {
    pub(super) fn check_composition(
        &self,
        composition: &Composition,
        value: &Value,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        match composition {
            Composition::AllOf(branches) => {
                for branch in branches {
                    self.check(branch, value, context, errors);
                }
            }
            Composition::AnyOf(branches) => {
                let mut branch_errors = Vec::with_capacity(branches.len());
                for branch in branches {
                    let failures = self.errors_for(branch, value, context);
                    if failures.is_empty() {
                        return;
                    }
                    branch_errors.push(failures);
                }
                errors.push(violation(
                    CompositionKind::AnyOf,
                    CompositionDetail::NoneMatched { branch_errors },
                    context,
                ));
            }
            Composition::OneOf(branches) => {
                let mut matched = Vec::new();
                let mut branch_errors = Vec::with_capacity(branches.len());
                for (index, branch) in branches.iter().enumerate() {
                    let failures = self.errors_for(branch, value, context);
                    if failures.is_empty() {
                        matched.push(index);
                    }
                    branch_errors.push(failures);
                }
                let detail = match matched.len() {
                    1 => return,
                    0 => CompositionDetail::NoneMatched { branch_errors },
                    _ => CompositionDetail::MultipleMatched { indices: matched },
                };
                errors.push(violation(CompositionKind::OneOf, detail, context));
            }
            Composition::Not(inner) => {
                if self.passes(inner, value, context) {
                    errors.push(violation(
                        CompositionKind::Not,
                        CompositionDetail::NegatedSchemaMatched,
                        context,
                    ));
                }
            }
            Composition::IfThenElse {
                condition,
                then,
                otherwise,
            } => {
                // The condition's own errors are never reported.
                let branch = if self.passes(condition, value, context) {
                    then
                } else {
                    otherwise
                };
                if let Some(branch) = branch {
                    self.check(branch, value, context, errors);
                }
            }
        }
    }
}

fn violation(
    kind: CompositionKind,
    detail: CompositionDetail,
    context: &ValidationContext,
) -> ValidationError {
    ValidationError::CompositionViolation {
        path: context.path().to_string(),
        kind,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{NumericSchema, ObjectSchema, Schema, StringSchema};
    use crate::validation::{CompositionDetail, CompositionKind, ValidationError, Validator};
    use serde_json::{json, Value};

    fn errors(schema: &Schema, value: Value) -> Vec<ValidationError> {
        Validator::new(schema).unwrap().validate(&value).into_errors()
    }

    #[test]
    fn test_all_of_reports_branch_errors_directly() {
        let schema = Schema::all_of(vec![
            StringSchema::new().min_length(3).into(),
            StringSchema::new().max_length(1).into(),
        ]);
        let errors = errors(&schema, json!("ab"));
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::MinLengthViolation { .. }));
        assert!(matches!(errors[1], ValidationError::MaxLengthViolation { .. }));
    }

    #[test]
    fn test_any_of_single_summary() {
        let schema = Schema::any_of(vec![Schema::string(), Schema::integer()]);
        assert!(errors(&schema, json!(5)).is_empty());
        let errors = errors(&schema, json!(true));
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::CompositionViolation {
                kind: CompositionKind::AnyOf,
                detail: CompositionDetail::NoneMatched { branch_errors },
                ..
            } => {
                assert_eq!(branch_errors.len(), 2);
                assert!(branch_errors.iter().all(|branch| branch.len() == 1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_one_of_multiple_matched() {
        let schema = Schema::one_of(vec![
            Schema::number(),
            NumericSchema::new().minimum(0).integer(),
        ]);
        assert!(errors(&schema, json!(1.5)).is_empty());
        assert!(matches!(
            &errors(&schema, json!(3))[0],
            ValidationError::CompositionViolation {
                kind: CompositionKind::OneOf,
                detail: CompositionDetail::MultipleMatched { indices },
                ..
            } if indices == &vec![0, 1]
        ));
    }

    #[test]
    fn test_not() {
        let schema = Schema::not(Schema::null());
        assert!(errors(&schema, json!(0)).is_empty());
        assert!(matches!(
            &errors(&schema, json!(null))[0],
            ValidationError::CompositionViolation {
                detail: CompositionDetail::NegatedSchemaMatched,
                ..
            }
        ));
    }

    #[test]
    fn test_if_then_else_selects_branch() {
        let is_business = ObjectSchema::new().required("vat_id");
        let schema = Schema::if_then_else(
            is_business,
            Some(ObjectSchema::new().required("company").into()),
            Some(ObjectSchema::new().required("first_name").into()),
        );
        assert!(errors(&schema, json!({"vat_id": "x", "company": "Acme"})).is_empty());
        assert!(errors(&schema, json!({"first_name": "Ada"})).is_empty());

        let errors = errors(&schema, json!({"vat_id": "x"}));
        assert!(matches!(
            &errors[..],
            [ValidationError::MissingField { name, .. }] if name == "company"
        ));
    }

    #[test]
    fn test_if_without_else_passes_on_failed_condition() {
        let schema = Schema::if_then_else(Schema::string(), Some(Schema::null()), None);
        assert!(errors(&schema, json!(42)).is_empty());
    }
}
