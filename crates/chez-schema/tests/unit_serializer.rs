//! Unit tests for rendering schemas as JSON Schema documents

use chez_schema::{
    Additional, ArraySchema, NumericSchema, ObjectSchema, Pattern, Schema, SchemaDocument,
    StringSchema, ToJsonSchema, WithMetadata, DRAFT_2020_12,
};
use serde_json::json;

fn user_schema() -> Schema {
    ObjectSchema::new()
        .required_property("name", StringSchema::new().min_length(1).max_length(64))
        .property("age", NumericSchema::new().minimum(0).maximum(150).integer())
        .property(
            "tags",
            ArraySchema::new()
                .items(StringSchema::new())
                .unique_items(true)
                .max_items(10),
        )
        .pattern_property(Pattern::new("^x-").unwrap(), Schema::string())
        .deny_additional()
        .title("User")
        .description("A registered user")
        .into()
}

#[test]
fn test_user_document_shape() {
    assert_eq!(
        user_schema().to_json_schema(),
        json!({
            "type": "object",
            "title": "User",
            "description": "A registered user",
            "required": ["name"],
            "additionalProperties": false,
            "patternProperties": {"^x-": {"type": "string"}},
            "properties": {
                "name": {"type": "string", "minLength": 1, "maxLength": 64},
                "age": {"type": "integer", "minimum": 0, "maximum": 150},
                "tags": {
                    "type": "array",
                    "items": {"type": "string"},
                    "uniqueItems": true,
                    "maxItems": 10
                }
            }
        })
    );
}

#[test]
fn test_absent_keywords_are_omitted() {
    let rendered = Schema::string().to_json_schema();
    assert_eq!(rendered, json!({"type": "string"}));
    assert!(!rendered.to_string().contains("null"));
}

#[test]
fn test_round_trip_preserves_schema() {
    let schema = user_schema();
    let reparsed = Schema::from_json_schema(&schema.to_json_schema()).unwrap();
    assert_eq!(reparsed, schema);
}

#[test]
fn test_serialization_is_idempotent() {
    let once = user_schema().to_json_schema();
    let twice = Schema::from_json_schema(&once).unwrap().to_json_schema();
    assert_eq!(once, twice);
}

#[test]
fn test_metadata_examples_and_default() {
    let schema = Schema::from(StringSchema::new().format("date"))
        .default_value(json!("2025-01-01"))
        .example(json!("2025-06-30"));
    assert_eq!(
        schema.to_json_schema(),
        json!({
            "type": "string",
            "format": "date",
            "default": "2025-01-01",
            "examples": ["2025-06-30"]
        })
    );
}

#[test]
fn test_unevaluated_properties_rendering() {
    let schema: Schema = ObjectSchema::new()
        .property("id", Schema::integer())
        .unevaluated_properties(Additional::Disallowed)
        .into();
    assert_eq!(
        schema.to_json_schema(),
        json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}},
            "unevaluatedProperties": false
        })
    );
}

#[test]
fn test_document_rendering() {
    let document = SchemaDocument::new(Schema::reference("#/$defs/id"))
        .with_id("https://example.com/order.json")
        .with_def("id", StringSchema::new().format("uuid"));

    let rendered = document.to_json();
    assert_eq!(rendered["$schema"], json!(DRAFT_2020_12));
    assert_eq!(rendered["$id"], json!("https://example.com/order.json"));
    assert_eq!(rendered["$ref"], json!("#/$defs/id"));
    assert_eq!(
        rendered["$defs"]["id"],
        json!({"type": "string", "format": "uuid"})
    );

    let reparsed = SchemaDocument::from_json(&rendered).unwrap();
    assert_eq!(reparsed.root, document.root);
    assert_eq!(reparsed.defs, document.defs);
    assert_eq!(reparsed.id, document.id);
}
