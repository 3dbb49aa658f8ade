//! Validator facade and per-variant dispatch
//!
//! A [`Validator`] is prepared once per schema: preparation resolves every
//! reachable `$ref` and rejects reference loops, so configuration problems
//! surface as a [`SchemaError`] before any value is looked at. After that,
//! validation is a pure recursion over the schema and the value that never
//! fails; it only collects [`ValidationError`]s.
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::document::ReferenceResolver;
use crate::formats::FormatRegistry;
use crate::schema::{RefSchema, Schema, SchemaResult};
use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::{JsonType, ValidationError, ValidationResult};
use crate::validation::preflight;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Runtime switches for validation
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Whether `format` is asserted (`true`) or treated as an annotation
    pub validate_formats: bool,
    /// Checkers used when formats are asserted
    pub formats: FormatRegistry,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            validate_formats: true,
            formats: FormatRegistry::new(),
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat every `format` keyword as an annotation
    pub fn without_format_assertions(mut self) -> Self {
        self.validate_formats = false;
        self
    }

    /// Use a custom set of format checkers
    pub fn with_formats(mut self, formats: FormatRegistry) -> Self {
        self.formats = formats;
        self
    }
}

/// A schema prepared for validation
#[derive(Debug)]
pub struct Validator<'a> {
    root: &'a Schema,
    references: HashMap<String, &'a Schema>,
    options: ValidationOptions,
}

impl<'a> Validator<'a> {
    /// Prepare a schema that contains no `$ref`
    ///
    /// Any `$ref` in the tree is reported as
    /// [`SchemaError::UnresolvedReference`](crate::schema::SchemaError::UnresolvedReference).
    pub fn new(root: &'a Schema) -> SchemaResult<Self> {
        Self::prepare(root, None)
    }

    /// Prepare a schema whose `$ref`s are looked up in `resolver`
    pub fn with_resolver(
        root: &'a Schema,
        resolver: &'a dyn ReferenceResolver,
    ) -> SchemaResult<Self> {
        Self::prepare(root, Some(resolver))
    }

    fn prepare(
        root: &'a Schema,
        resolver: Option<&'a dyn ReferenceResolver>,
    ) -> SchemaResult<Self> {
        let references = preflight::resolve_references(root, resolver)?;
        debug!(
            root = root.kind_name(),
            references = references.len(),
            "Prepared schema for validation"
        );
        Ok(Self {
            root,
            references,
            options: ValidationOptions::default(),
        })
    }

    /// Replace the validation options
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// The root schema
    pub fn schema(&self) -> &'a Schema {
        self.root
    }

    /// Validate a value positioned at the root path
    pub fn validate(&self, value: &Value) -> ValidationResult {
        self.validate_with_context(value, &ValidationContext::new())
    }

    /// Validate a value positioned at `context`
    pub fn validate_with_context(
        &self,
        value: &Value,
        context: &ValidationContext,
    ) -> ValidationResult {
        let errors = self.errors_for(self.root, value, context);
        debug!(
            path = context.path(),
            errors = errors.len(),
            "Validation finished"
        );
        ValidationResult::from_errors(errors)
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.errors_for(self.root, value, &ValidationContext::new())
            .is_empty()
    }

    /// Validate independent documents, each at the root path
    pub fn validate_batch(&self, values: &[Value]) -> Vec<ValidationResult> {
        values.iter().map(|value| self.validate(value)).collect()
    }

    /// Errors produced by validating `value` against `schema`
    pub(crate) fn errors_for(
        &self,
        schema: &Schema,
        value: &Value,
        context: &ValidationContext,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.check(schema, value, context, &mut errors);
        errors
    }

    /// Whether `value` satisfies `schema`; the errors are discarded
    pub(crate) fn passes(
        &self,
        schema: &Schema,
        value: &Value,
        context: &ValidationContext,
    ) -> bool {
        self.errors_for(schema, value, context).is_empty()
    }

    /// Append every violation of `schema` by `value` to `errors`
    ///
    /// The type is checked first; on mismatch no other keyword of the node
    /// is evaluated.
    pub(crate) fn check(
        &self,
        schema: &Schema,
        value: &Value,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        match schema {
            Schema::String(string) => match value {
                Value::String(text) => self.check_string(string, text, context, errors),
                other => errors.push(type_mismatch(JsonType::String, other, context)),
            },
            Schema::Number(numeric) => match value {
                Value::Number(number) => self.check_numeric(numeric, number, context, errors),
                other => errors.push(type_mismatch(JsonType::Number, other, context)),
            },
            Schema::Integer(numeric) => match value {
                Value::Number(number) if ValidationHelpers::is_integer(number) => {
                    self.check_numeric(numeric, number, context, errors)
                }
                other => errors.push(type_mismatch(JsonType::Integer, other, context)),
            },
            Schema::Boolean(boolean) => match value {
                Value::Bool(flag) => self.check_boolean(boolean, *flag, context, errors),
                other => errors.push(type_mismatch(JsonType::Boolean, other, context)),
            },
            Schema::Null(_) => {
                if !value.is_null() {
                    errors.push(type_mismatch(JsonType::Null, value, context));
                }
            }
            Schema::Enum(enumeration) => self.check_enum(enumeration, value, context, errors),
            Schema::Array(array) => match value {
                Value::Array(items) => self.check_array(array, items, context, errors),
                other => errors.push(type_mismatch(JsonType::Array, other, context)),
            },
            Schema::Object(object) => match value {
                Value::Object(members) => {
                    self.check_object(object, value, members, context, errors)
                }
                other => errors.push(type_mismatch(JsonType::Object, other, context)),
            },
            Schema::Composition(composition) => {
                self.check_composition(&composition.composition, value, context, errors)
            }
            Schema::Ref(reference) => self.check_reference(reference, value, context, errors),
        }
    }

    fn check_reference(
        &self,
        reference: &RefSchema,
        value: &Value,
        context: &ValidationContext,
        errors: &mut Vec<ValidationError>,
    ) {
        // Preparation resolved every reachable pointer.
        let Some(target) = self.references.get(reference.pointer.as_str()) else {
            return;
        };
        trace!(pointer = %reference.pointer, path = context.path(), "Following reference");
        self.check(target, value, context, errors);
    }

    /// Resolved target of a `$ref` reachable from the root
    pub(crate) fn resolved(&self, pointer: &str) -> Option<&'a Schema> {
        self.references.get(pointer).copied()
    }
}

pub(crate) fn type_mismatch(
    expected: JsonType,
    actual: &Value,
    context: &ValidationContext,
) -> ValidationError {
    ValidationError::TypeMismatch {
        path: context.path().to_string(),
        expected,
        actual: JsonType::of(actual),
    }
}

/// Prepare `schema` and validate `value` at `context` in one call
///
/// Fails with a [`SchemaError`](crate::schema::SchemaError) when the schema
/// contains a `$ref`; use [`Validator::with_resolver`] or
/// [`SchemaDocument`](crate::document::SchemaDocument) for those.
pub fn validate(
    schema: &Schema,
    value: &Value,
    context: &ValidationContext,
) -> SchemaResult<ValidationResult> {
    Ok(Validator::new(schema)?.validate_with_context(value, context))
}
