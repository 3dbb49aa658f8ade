//! Scalar schema variants: string, number/integer, boolean, null and enum
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use super::{Metadata, Pattern, Schema};
use serde_json::{Number, Value};

/// Constraints for JSON strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    /// Minimum length in Unicode scalar values
    pub min_length: Option<usize>,
    /// Maximum length in Unicode scalar values
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    /// Format name, e.g. `email`; unknown names are annotations only
    pub format: Option<String>,
    pub const_value: Option<String>,
    pub metadata: Metadata,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn const_value(mut self, value: impl Into<String>) -> Self {
        self.const_value = Some(value.into());
        self
    }
}

/// Constraints shared by `number` and `integer` schemas
///
/// Bounds are kept as [`Number`] so integers round-trip without gaining a
/// fractional part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSchema {
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub multiple_of: Option<Number>,
    pub const_value: Option<Number>,
    pub metadata: Metadata,
}

impl NumericSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum(mut self, bound: impl Into<Number>) -> Self {
        self.minimum = Some(bound.into());
        self
    }

    pub fn maximum(mut self, bound: impl Into<Number>) -> Self {
        self.maximum = Some(bound.into());
        self
    }

    pub fn exclusive_minimum(mut self, bound: impl Into<Number>) -> Self {
        self.exclusive_minimum = Some(bound.into());
        self
    }

    pub fn exclusive_maximum(mut self, bound: impl Into<Number>) -> Self {
        self.exclusive_maximum = Some(bound.into());
        self
    }

    pub fn multiple_of(mut self, divisor: impl Into<Number>) -> Self {
        self.multiple_of = Some(divisor.into());
        self
    }

    pub fn const_value(mut self, value: impl Into<Number>) -> Self {
        self.const_value = Some(value.into());
        self
    }

    /// Float bounds; non-finite values cannot be represented in JSON
    pub fn minimum_f64(self, bound: f64) -> Self {
        match Number::from_f64(bound) {
            Some(n) => self.minimum(n),
            None => self,
        }
    }

    pub fn maximum_f64(self, bound: f64) -> Self {
        match Number::from_f64(bound) {
            Some(n) => self.maximum(n),
            None => self,
        }
    }

    pub fn multiple_of_f64(self, divisor: f64) -> Self {
        match Number::from_f64(divisor) {
            Some(n) => self.multiple_of(n),
            None => self,
        }
    }

    /// Finish as a `number` schema
    pub fn number(self) -> Schema {
        Schema::Number(self)
    }

    /// Finish as an `integer` schema
    pub fn integer(self) -> Schema {
        Schema::Integer(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanSchema {
    pub const_value: Option<bool>,
    pub metadata: Metadata,
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn const_value(mut self, value: bool) -> Self {
        self.const_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullSchema {
    pub metadata: Metadata,
}

impl NullSchema {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A closed set of allowed JSON values
///
/// Covers string, number, boolean and null enums as well as heterogeneous
/// ones. `string_only` adds a `string` type requirement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumSchema {
    pub values: Vec<Value>,
    pub string_only: bool,
    pub metadata: Metadata,
}

impl EnumSchema {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
            string_only: false,
            metadata: Metadata::default(),
        }
    }

    /// An enum whose members are all strings
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(|s| Value::String(s.into())).collect(),
            string_only: true,
            metadata: Metadata::default(),
        }
    }

    /// Add one more allowed value
    pub fn value(mut self, value: Value) -> Self {
        self.values.push(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_builders_keep_integer_bounds() {
        let schema = NumericSchema::new().minimum(0).maximum(25);
        assert_eq!(schema.minimum, Some(Number::from(0)));
        assert!(schema.minimum.as_ref().unwrap().is_i64());
    }

    #[test]
    fn test_non_finite_float_bounds_are_ignored() {
        let schema = NumericSchema::new().minimum_f64(f64::NAN).maximum_f64(1.5);
        assert!(schema.minimum.is_none());
        assert_eq!(schema.maximum.unwrap().as_f64(), Some(1.5));
    }

    #[test]
    fn test_string_enum() {
        let schema = EnumSchema::strings(["red", "green"]);
        assert!(schema.string_only);
        assert_eq!(schema.values, vec![json!("red"), json!("green")]);
    }
}
