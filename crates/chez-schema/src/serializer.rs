//! Rendering schemas as JSON Schema 2020-12 documents
//!
//! Keywords are spelled exactly as in the 2020-12 vocabulary. Absent optional
//! keywords are omitted rather than rendered as `null`, and the output parses
//! back into an equal [`Schema`] through
//! [`Schema::from_json_schema`](crate::schema::Schema::from_json_schema).
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::schema::{
    Additional, ArraySchema, BooleanSchema, Composition, EnumSchema, Metadata, NumericSchema,
    ObjectSchema, Schema, StringSchema,
};
use serde_json::{json, Map, Number, Value};

/// Meta-schema URI of the dialect produced by the serializer
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Conversion into a canonical JSON Schema document
pub trait ToJsonSchema {
    fn to_json_schema(&self) -> Value;
}

impl ToJsonSchema for Schema {
    fn to_json_schema(&self) -> Value {
        Value::Object(render_keywords(self))
    }
}

/// The keyword map of a rendered schema
pub(crate) fn render_keywords(schema: &Schema) -> Map<String, Value> {
    let mut document = Map::new();
    match schema {
        Schema::String(string) => render_string(string, &mut document),
        Schema::Number(numeric) => render_numeric("number", numeric, &mut document),
        Schema::Integer(numeric) => render_numeric("integer", numeric, &mut document),
        Schema::Boolean(boolean) => render_boolean(boolean, &mut document),
        Schema::Null(_) => {
            document.insert("type".into(), json!("null"));
        }
        Schema::Enum(enumeration) => render_enum(enumeration, &mut document),
        Schema::Array(array) => render_array(array, &mut document),
        Schema::Object(object) => render_object(object, &mut document),
        Schema::Composition(composition) => {
            render_composition(&composition.composition, &mut document)
        }
        Schema::Ref(reference) => {
            document.insert("$ref".into(), json!(reference.pointer));
        }
    }
    render_metadata(schema.metadata(), &mut document);
    document
}

impl ToJsonSchema for Additional {
    /// `AllowAny` renders as `true`; callers omit it where absence means the same
    fn to_json_schema(&self) -> Value {
        match self {
            Additional::AllowAny => Value::Bool(true),
            Additional::Disallowed => Value::Bool(false),
            Additional::Schema(schema) => schema.to_json_schema(),
        }
    }
}

fn insert_usize(document: &mut Map<String, Value>, keyword: &str, value: Option<usize>) {
    if let Some(value) = value {
        document.insert(keyword.to_string(), Value::Number(Number::from(value)));
    }
}

fn insert_number(document: &mut Map<String, Value>, keyword: &str, value: &Option<Number>) {
    if let Some(value) = value {
        document.insert(keyword.to_string(), Value::Number(value.clone()));
    }
}

fn insert_schema(document: &mut Map<String, Value>, keyword: &str, schema: Option<&Schema>) {
    if let Some(schema) = schema {
        document.insert(keyword.to_string(), schema.to_json_schema());
    }
}

fn render_list(schemas: &[Schema]) -> Value {
    Value::Array(schemas.iter().map(ToJsonSchema::to_json_schema).collect())
}

fn render_string(schema: &StringSchema, document: &mut Map<String, Value>) {
    document.insert("type".into(), json!("string"));
    insert_usize(document, "minLength", schema.min_length);
    insert_usize(document, "maxLength", schema.max_length);
    if let Some(pattern) = &schema.pattern {
        document.insert("pattern".into(), json!(pattern.as_str()));
    }
    if let Some(format) = &schema.format {
        document.insert("format".into(), json!(format));
    }
    if let Some(value) = &schema.const_value {
        document.insert("const".into(), json!(value));
    }
}

fn render_numeric(type_name: &str, schema: &NumericSchema, document: &mut Map<String, Value>) {
    document.insert("type".into(), json!(type_name));
    insert_number(document, "minimum", &schema.minimum);
    insert_number(document, "maximum", &schema.maximum);
    insert_number(document, "exclusiveMinimum", &schema.exclusive_minimum);
    insert_number(document, "exclusiveMaximum", &schema.exclusive_maximum);
    insert_number(document, "multipleOf", &schema.multiple_of);
    insert_number(document, "const", &schema.const_value);
}

fn render_boolean(schema: &BooleanSchema, document: &mut Map<String, Value>) {
    document.insert("type".into(), json!("boolean"));
    if let Some(value) = schema.const_value {
        document.insert("const".into(), Value::Bool(value));
    }
}

fn render_enum(schema: &EnumSchema, document: &mut Map<String, Value>) {
    if schema.string_only {
        document.insert("type".into(), json!("string"));
    }
    document.insert("enum".into(), Value::Array(schema.values.clone()));
}

fn render_array(schema: &ArraySchema, document: &mut Map<String, Value>) {
    document.insert("type".into(), json!("array"));
    if !schema.prefix_items.is_empty() {
        document.insert("prefixItems".into(), render_list(&schema.prefix_items));
    }
    insert_schema(document, "items", schema.items.as_deref());
    insert_usize(document, "minItems", schema.min_items);
    insert_usize(document, "maxItems", schema.max_items);
    if schema.unique_items {
        document.insert("uniqueItems".into(), Value::Bool(true));
    }
    insert_schema(document, "contains", schema.contains.as_deref());
    insert_usize(document, "minContains", schema.min_contains);
    insert_usize(document, "maxContains", schema.max_contains);
    if let Some(policy) = &schema.unevaluated_items {
        document.insert("unevaluatedItems".into(), policy.to_json_schema());
    }
}

fn render_object(schema: &ObjectSchema, document: &mut Map<String, Value>) {
    document.insert("type".into(), json!("object"));
    if !schema.properties.is_empty() {
        let properties: Map<String, Value> = schema
            .properties
            .iter()
            .map(|(name, property)| (name.clone(), property.to_json_schema()))
            .collect();
        document.insert("properties".into(), Value::Object(properties));
    }
    if !schema.required.is_empty() {
        document.insert("required".into(), json!(schema.required));
    }
    insert_usize(document, "minProperties", schema.min_properties);
    insert_usize(document, "maxProperties", schema.max_properties);
    if !schema.additional_properties.is_allow_any() {
        document.insert(
            "additionalProperties".into(),
            schema.additional_properties.to_json_schema(),
        );
    }
    if !schema.pattern_properties.is_empty() {
        let patterns: Map<String, Value> = schema
            .pattern_properties
            .iter()
            .map(|(pattern, property)| (pattern.as_str().to_string(), property.to_json_schema()))
            .collect();
        document.insert("patternProperties".into(), Value::Object(patterns));
    }
    insert_schema(document, "propertyNames", schema.property_names.as_deref());
    if !schema.dependent_required.is_empty() {
        document.insert("dependentRequired".into(), json!(schema.dependent_required));
    }
    if !schema.dependent_schemas.is_empty() {
        let dependents: Map<String, Value> = schema
            .dependent_schemas
            .iter()
            .map(|(trigger, dependent)| (trigger.clone(), dependent.to_json_schema()))
            .collect();
        document.insert("dependentSchemas".into(), Value::Object(dependents));
    }
    if let Some(policy) = &schema.unevaluated_properties {
        document.insert("unevaluatedProperties".into(), policy.to_json_schema());
    }
}

fn render_composition(composition: &Composition, document: &mut Map<String, Value>) {
    match composition {
        Composition::AnyOf(branches) => {
            document.insert("anyOf".into(), render_list(branches));
        }
        Composition::OneOf(branches) => {
            document.insert("oneOf".into(), render_list(branches));
        }
        Composition::AllOf(branches) => {
            document.insert("allOf".into(), render_list(branches));
        }
        Composition::Not(inner) => {
            document.insert("not".into(), inner.to_json_schema());
        }
        Composition::IfThenElse {
            condition,
            then,
            otherwise,
        } => {
            document.insert("if".into(), condition.to_json_schema());
            insert_schema(document, "then", then.as_deref());
            insert_schema(document, "else", otherwise.as_deref());
        }
    }
}

fn render_metadata(metadata: &Metadata, document: &mut Map<String, Value>) {
    if let Some(title) = &metadata.title {
        document.insert("title".into(), json!(title));
    }
    if let Some(description) = &metadata.description {
        document.insert("description".into(), json!(description));
    }
    if let Some(default) = &metadata.default {
        document.insert("default".into(), default.clone());
    }
    if !metadata.examples.is_empty() {
        document.insert("examples".into(), Value::Array(metadata.examples.clone()));
    }
}
