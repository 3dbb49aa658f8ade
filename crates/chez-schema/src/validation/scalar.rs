//! String, numeric, boolean and enum keywords
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::schema::{BooleanSchema, EnumSchema, NumericSchema, StringSchema};
use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::{JsonType, RangeKind, ValidationError};
use crate::validation::validator::{type_mismatch, Validator};
use serde_json::{Number, Value};
use std::cmp::Ordering;

impl Validator<'_> {
    /// minLength, maxLength, pattern, const, format
    pub(super) fn check_string(
        &self,
        schema: &StringSchema,
        text: &str,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        if schema.min_length.is_some() || schema.max_length.is_some() {
            let length = ValidationHelpers::string_length(text);
            if let Some(min) = schema.min_length {
                if length < min {
                    errors.push(ValidationError::MinLengthViolation {
                        path: context.path().to_string(),
                        min,
                        actual: length,
                    });
                }
            }
            if let Some(max) = schema.max_length {
                if length > max {
                    errors.push(ValidationError::MaxLengthViolation {
                        path: context.path().to_string(),
                        max,
                        actual: length,
                    });
                }
            }
        }

        if let Some(pattern) = &schema.pattern {
            if !pattern.is_match(text) {
                errors.push(ValidationError::PatternMismatch {
                    path: context.path().to_string(),
                    pattern: pattern.as_str().to_string(),
                    actual: text.to_string(),
                });
            }
        }

        if let Some(expected) = &schema.const_value {
            if expected != text {
                errors.push(ValidationError::ConstMismatch {
                    path: context.path().to_string(),
                    expected: Value::String(expected.clone()),
                    actual: Value::String(text.to_string()),
                });
            }
        }

        if let Some(format) = &schema.format {
            if self.options().validate_formats && !self.options().formats.check(format, text) {
                errors.push(ValidationError::InvalidFormat {
                    path: context.path().to_string(),
                    format: format.clone(),
                    actual: text.to_string(),
                });
            }
        }
    }

    /// minimum, maximum, exclusiveMinimum, exclusiveMaximum, multipleOf, const
    pub(super) fn check_numeric(
        &self,
        schema: &NumericSchema,
        number: &Number,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        let bounds = [
            (RangeKind::Minimum, &schema.minimum),
            (RangeKind::Maximum, &schema.maximum),
            (RangeKind::ExclusiveMinimum, &schema.exclusive_minimum),
            (RangeKind::ExclusiveMaximum, &schema.exclusive_maximum),
        ];
        for (kind, bound) in bounds {
            let Some(bound) = bound else {
                continue;
            };
            if !within_bound(kind, number, bound) {
                errors.push(ValidationError::OutOfRange {
                    path: context.path().to_string(),
                    kind,
                    bound: bound.clone(),
                    actual: number.clone(),
                });
            }
        }

        if let Some(divisor) = &schema.multiple_of {
            if !ValidationHelpers::is_multiple_of(number, divisor) {
                errors.push(ValidationError::MultipleOfViolation {
                    path: context.path().to_string(),
                    multiple_of: divisor.clone(),
                    actual: number.clone(),
                });
            }
        }

        if let Some(expected) = &schema.const_value {
            if !ValidationHelpers::numbers_equal(expected, number) {
                errors.push(ValidationError::ConstMismatch {
                    path: context.path().to_string(),
                    expected: Value::Number(expected.clone()),
                    actual: Value::Number(number.clone()),
                });
            }
        }
    }

    pub(super) fn check_boolean(
        &self,
        schema: &BooleanSchema,
        flag: bool,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(expected) = schema.const_value {
            if expected != flag {
                errors.push(ValidationError::ConstMismatch {
                    path: context.path().to_string(),
                    expected: Value::Bool(expected),
                    actual: Value::Bool(flag),
                });
            }
        }
    }

    pub(super) fn check_enum(
        &self,
        schema: &EnumSchema,
        value: &Value,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        if schema.string_only && !value.is_string() {
            errors.push(type_mismatch(JsonType::String, value, context));
            return;
        }
        if !schema
            .values
            .iter()
            .any(|allowed| ValidationHelpers::json_equal(allowed, value))
        {
            errors.push(ValidationError::NotInEnum {
                path: context.path().to_string(),
                allowed: schema.values.clone(),
                actual: value.clone(),
            });
        }
    }
}

/// Incomparable numbers (never produced by JSON parsing) count as in range
fn within_bound(kind: RangeKind, number: &Number, bound: &Number) -> bool {
    let Some(ordering) = ValidationHelpers::compare_numbers(number, bound) else {
        return true;
    };
    match kind {
        RangeKind::Minimum => ordering != Ordering::Less,
        RangeKind::Maximum => ordering != Ordering::Greater,
        RangeKind::ExclusiveMinimum => ordering == Ordering::Greater,
        RangeKind::ExclusiveMaximum => ordering == Ordering::Less,
    }
}
