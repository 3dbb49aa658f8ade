//! Validation demonstration example
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use chez_schema::{
    ObjectSchema, Schema, SchemaDocument, StringSchema, ToJsonSchema, ValidationContext,
    WithMetadata,
};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Chez Schema Validation Demo ===\n");

    demo_builder_validation()?;

    println!();

    demo_document_validation()?;

    Ok(())
}

fn demo_builder_validation() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Builder Schema Demo ---");

    let schema: Schema = ObjectSchema::new()
        .required_property("name", StringSchema::new().min_length(1))
        .property("email", StringSchema::new().format("email"))
        .deny_additional()
        .title("Contact")
        .into();

    println!("Schema document:");
    println!("{}", serde_json::to_string_pretty(&schema.to_json_schema())?);

    let valid = json!({"name": "Ada", "email": "ada@example.com"});
    let result = chez_schema::validate(&schema, &valid, &ValidationContext::new())?;
    println!("✅ {} -> valid: {}", valid, result.is_valid());

    let invalid = json!({"name": "", "email": "nope", "phone": "555"});
    let result = chez_schema::validate(&schema, &invalid, &ValidationContext::new())?;
    println!("❌ {} -> {} error(s):", invalid, result.errors().len());
    for error in result.errors() {
        println!("   {} [{}]", error, error.kind());
    }

    Ok(())
}

fn demo_document_validation() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Document With $defs Demo ---");

    let document = SchemaDocument::from_json(&json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$defs": {
            "shape": {
                "oneOf": [
                    {"type": "object", "required": ["radius"], "properties": {"radius": {"type": "number"}}},
                    {"type": "object", "required": ["width", "height"]}
                ]
            }
        },
        "type": "array",
        "items": {"$ref": "#/$defs/shape"}
    }))?;

    let shapes = json!([{"radius": 2}, {"width": 1, "height": 3}, {"side": 4}]);
    let result = document.validate(&shapes)?;
    println!("Validated {} shapes, {} error(s)", 3, result.errors().len());
    for error in result.errors() {
        println!("   {}", error);
    }

    Ok(())
}
