//! Validation error types
//!
//! Every violated constraint becomes one [`ValidationError`] tagged with the
//! JSON pointer of the offending value. A validation call returns all of
//! them, in the order the constraints were checked, as a
//! [`ValidationResult`].
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use thiserror::Error;

/// JSON value types, as named by the `type` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Type of a concrete value; integral numbers report `integer`
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which numeric bound was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeKind {
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::Minimum => "greater than or equal to",
            Self::Maximum => "less than or equal to",
            Self::ExclusiveMinimum => "strictly greater than",
            Self::ExclusiveMaximum => "strictly less than",
        };
        f.write_str(description)
    }
}

/// Composition keyword that failed
///
/// `allOf` never appears here: its branch errors are reported directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositionKind {
    AnyOf,
    OneOf,
    Not,
}

impl fmt::Display for CompositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
            Self::Not => "not",
        })
    }
}

/// Why a composition keyword failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CompositionDetail {
    /// No branch accepted the value; one error list per branch, in order
    NoneMatched { branch_errors: Vec<Vec<ValidationError>> },
    /// More than one `oneOf` branch accepted the value
    MultipleMatched { indices: Vec<usize> },
    /// The `not` schema accepted the value
    NegatedSchemaMatched,
}

impl fmt::Display for CompositionDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoneMatched { branch_errors } => {
                write!(f, "none of the {} branches matched", branch_errors.len())
            }
            Self::MultipleMatched { indices } => {
                let indices = indices
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "branches {} all matched, expected exactly one", indices)
            }
            Self::NegatedSchemaMatched => f.write_str("value matched the negated schema"),
        }
    }
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{path}: expected {expected}, found {actual}")]
    TypeMismatch {
        path: String,
        expected: JsonType,
        actual: JsonType,
    },

    #[error("{path}: string is {actual} characters long, minimum is {min}")]
    MinLengthViolation { path: String, min: usize, actual: usize },

    #[error("{path}: string is {actual} characters long, maximum is {max}")]
    MaxLengthViolation { path: String, max: usize, actual: usize },

    #[error("{path}: '{actual}' does not match pattern '{pattern}'")]
    PatternMismatch {
        path: String,
        pattern: String,
        actual: String,
    },

    #[error("{path}: '{actual}' is not a valid {format}")]
    InvalidFormat {
        path: String,
        format: String,
        actual: String,
    },

    #[error("{path}: expected constant {expected}, found {actual}")]
    ConstMismatch {
        path: String,
        expected: Value,
        actual: Value,
    },

    #[error("{path}: {actual} is not one of {}", display_values(.allowed))]
    NotInEnum {
        path: String,
        allowed: Vec<Value>,
        actual: Value,
    },

    #[error("{path}: {actual} must be {kind} {bound}")]
    OutOfRange {
        path: String,
        kind: RangeKind,
        bound: Number,
        actual: Number,
    },

    #[error("{path}: {actual} is not a multiple of {multiple_of}")]
    MultipleOfViolation {
        path: String,
        multiple_of: Number,
        actual: Number,
    },

    #[error("{path}: array has {actual} items, minimum is {min}")]
    MinItemsViolation { path: String, min: usize, actual: usize },

    #[error("{path}: array has {actual} items, maximum is {max}")]
    MaxItemsViolation { path: String, max: usize, actual: usize },

    #[error("{path}: items {first} and {duplicate} are equal, items must be unique")]
    UniqueViolation {
        path: String,
        first: usize,
        duplicate: usize,
    },

    #[error("{path}: {actual} items match 'contains', expected between {min} and {}", display_max(.max))]
    ContainsViolation {
        path: String,
        min: usize,
        max: Option<usize>,
        actual: usize,
    },

    #[error("{path}: item {index} is not allowed by 'unevaluatedItems'")]
    UnevaluatedItem { path: String, index: usize },

    #[error("{path}: object has {actual} properties, minimum is {min}")]
    MinPropertiesViolation { path: String, min: usize, actual: usize },

    #[error("{path}: object has {actual} properties, maximum is {max}")]
    MaxPropertiesViolation { path: String, max: usize, actual: usize },

    #[error("{path}: required field '{name}' is missing")]
    MissingField { path: String, name: String },

    #[error("{path}: additional property '{name}' is not allowed")]
    AdditionalProperty { path: String, name: String },

    #[error("{path}: '{missing}' is required when '{trigger}' is present")]
    DependencyViolation {
        path: String,
        trigger: String,
        missing: String,
    },

    #[error("{path}: property '{name}' is not allowed by 'unevaluatedProperties'")]
    UnevaluatedProperty { path: String, name: String },

    #[error("{path}: {kind} failed, {detail}")]
    CompositionViolation {
        path: String,
        kind: CompositionKind,
        detail: CompositionDetail,
    },
}

fn display_values(values: &[Value]) -> String {
    let rendered = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", rendered)
}

fn display_max(max: &Option<usize>) -> String {
    max.map_or_else(|| "unbounded".to_string(), |m| m.to_string())
}

impl ValidationError {
    /// JSON pointer of the offending value
    pub fn path(&self) -> &str {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::MinLengthViolation { path, .. }
            | Self::MaxLengthViolation { path, .. }
            | Self::PatternMismatch { path, .. }
            | Self::InvalidFormat { path, .. }
            | Self::ConstMismatch { path, .. }
            | Self::NotInEnum { path, .. }
            | Self::OutOfRange { path, .. }
            | Self::MultipleOfViolation { path, .. }
            | Self::MinItemsViolation { path, .. }
            | Self::MaxItemsViolation { path, .. }
            | Self::UniqueViolation { path, .. }
            | Self::ContainsViolation { path, .. }
            | Self::UnevaluatedItem { path, .. }
            | Self::MinPropertiesViolation { path, .. }
            | Self::MaxPropertiesViolation { path, .. }
            | Self::MissingField { path, .. }
            | Self::AdditionalProperty { path, .. }
            | Self::DependencyViolation { path, .. }
            | Self::UnevaluatedProperty { path, .. }
            | Self::CompositionViolation { path, .. } => path,
        }
    }

    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::MinLengthViolation { .. } => "min_length_violation",
            Self::MaxLengthViolation { .. } => "max_length_violation",
            Self::PatternMismatch { .. } => "pattern_mismatch",
            Self::InvalidFormat { .. } => "invalid_format",
            Self::ConstMismatch { .. } => "const_mismatch",
            Self::NotInEnum { .. } => "not_in_enum",
            Self::OutOfRange { .. } => "out_of_range",
            Self::MultipleOfViolation { .. } => "multiple_of_violation",
            Self::MinItemsViolation { .. } => "min_items_violation",
            Self::MaxItemsViolation { .. } => "max_items_violation",
            Self::UniqueViolation { .. } => "unique_violation",
            Self::ContainsViolation { .. } => "contains_violation",
            Self::UnevaluatedItem { .. } => "unevaluated_item",
            Self::MinPropertiesViolation { .. } => "min_properties_violation",
            Self::MaxPropertiesViolation { .. } => "max_properties_violation",
            Self::MissingField { .. } => "missing_field",
            Self::AdditionalProperty { .. } => "additional_property",
            Self::DependencyViolation { .. } => "dependency_violation",
            Self::UnevaluatedProperty { .. } => "unevaluated_property",
            Self::CompositionViolation { .. } => "composition_violation",
        }
    }
}

/// Ordered, non-empty collection of validation errors
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(try_from = "RawErrors")]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

/// Wire shape of [`ValidationErrors`], checked for emptiness on the way in
#[derive(Deserialize)]
struct RawErrors {
    errors: Vec<ValidationError>,
}

impl TryFrom<RawErrors> for ValidationErrors {
    type Error = &'static str;

    fn try_from(raw: RawErrors) -> Result<Self, Self::Error> {
        Self::new(raw.errors).ok_or("an invalid result must carry at least one error")
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    /// Wrap a list of errors; `None` when the list is empty
    pub fn new(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Outcome of validating one value
///
/// `Valid` is returned exactly when no error was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationErrors),
}

impl ValidationResult {
    /// `Valid` for an empty list, `Invalid` otherwise
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        match ValidationErrors::new(errors) {
            Some(errors) => Self::Invalid(errors),
            None => Self::Valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Errors produced, empty when valid
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors.as_slice(),
        }
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        match self {
            Self::Valid => Vec::new(),
            Self::Invalid(errors) => errors.into_vec(),
        }
    }

    /// Convert to result - Ok if valid, Err with every error otherwise
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_from_empty_errors_is_valid() {
        let result = ValidationResult::from_errors(Vec::new());
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_result_from_errors_is_invalid() {
        let result = ValidationResult::from_errors(vec![ValidationError::MissingField {
            path: "/".to_string(),
            name: "name".to_string(),
        }]);
        assert!(result.is_invalid());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path(), "/");
    }

    #[test]
    fn test_error_display() {
        let error = ValidationError::OutOfRange {
            path: "/age".to_string(),
            kind: RangeKind::Minimum,
            bound: Number::from(0),
            actual: Number::from(-5),
        };
        assert_eq!(error.to_string(), "/age: -5 must be greater than or equal to 0");

        let error = ValidationError::ContainsViolation {
            path: "/".to_string(),
            min: 1,
            max: None,
            actual: 0,
        };
        assert!(error.to_string().ends_with("between 1 and unbounded"));

        let error = ValidationError::NotInEnum {
            path: "/color".to_string(),
            allowed: vec![json!("red"), json!(1)],
            actual: json!("blue"),
        };
        assert_eq!(error.to_string(), "/color: \"blue\" is not one of [\"red\", 1]");
    }

    #[test]
    fn test_errors_display_numbers_entries() {
        let errors = ValidationErrors::new(vec![
            ValidationError::MissingField {
                path: "/".to_string(),
                name: "a".to_string(),
            },
            ValidationError::MissingField {
                path: "/".to_string(),
                name: "b".to_string(),
            },
        ])
        .unwrap();
        let rendered = errors.to_string();
        assert!(rendered.starts_with("2 validation error(s):"));
        assert!(rendered.contains("\n2. /: required field 'b' is missing"));
    }

    #[test]
    fn test_error_serializes_with_error_tag() {
        let error = ValidationError::TypeMismatch {
            path: "/a".to_string(),
            expected: JsonType::String,
            actual: JsonType::Integer,
        };
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(
            value,
            json!({"error": "type_mismatch", "path": "/a", "expected": "string", "actual": "integer"})
        );
        assert_eq!(error.kind(), "type_mismatch");
    }

    #[test]
    fn test_range_and_composition_kinds_serialize() {
        let error = ValidationError::OutOfRange {
            path: "/age".to_string(),
            kind: RangeKind::ExclusiveMinimum,
            bound: Number::from(0),
            actual: Number::from(0),
        };
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["error"], "out_of_range");
        assert_eq!(value["kind"], "exclusiveMinimum");
        assert_eq!(serde_json::from_value::<ValidationError>(value).unwrap(), error);

        let error = ValidationError::CompositionViolation {
            path: "/".to_string(),
            kind: CompositionKind::OneOf,
            detail: CompositionDetail::MultipleMatched { indices: vec![0, 1] },
        };
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["kind"], "oneOf");
        assert_eq!(value["detail"]["reason"], "multiple_matched");
    }

    #[test]
    fn test_invalid_result_round_trips() {
        let result = ValidationResult::from_errors(vec![ValidationError::MissingField {
            path: "/".to_string(),
            name: "id".to_string(),
        }]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "invalid");
        assert_eq!(serde_json::from_value::<ValidationResult>(value).unwrap(), result);
    }

    #[test]
    fn test_invalid_result_without_errors_is_rejected() {
        let empty = json!({"status": "invalid", "errors": []});
        assert!(serde_json::from_value::<ValidationResult>(empty).is_err());
        assert!(serde_json::from_value::<ValidationErrors>(json!({"errors": []})).is_err());

        let valid = serde_json::from_value::<ValidationResult>(json!({"status": "valid"})).unwrap();
        assert!(valid.is_valid());
    }

    #[test]
    fn test_json_type_of() {
        assert_eq!(JsonType::of(&json!(1)), JsonType::Integer);
        assert_eq!(JsonType::of(&json!(1.5)), JsonType::Number);
        assert_eq!(JsonType::of(&json!(null)), JsonType::Null);
        assert_eq!(JsonType::of(&json!({})), JsonType::Object);
    }
}
