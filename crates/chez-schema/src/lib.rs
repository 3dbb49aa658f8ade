//! Chez Schema - a JSON Schema 2020-12 engine
//!
//! This crate models JSON Schema 2020-12 as a strongly typed [`Schema`]
//! tree, validates `serde_json::Value` instances against it, and renders
//! schemas back into canonical JSON Schema documents.
//!
//! ## Features
//!
//! - **Typed schema model**: string, numeric, boolean, null, enum, array,
//!   object, composition and `$ref` variants with fluent builders
//! - **Exhaustive validation**: every violation is reported with the JSON
//!   pointer of the offending value
//! - **Composition**: `allOf`, `anyOf`, `oneOf`, `not` and
//!   `if`/`then`/`else`, with per-branch diagnostics
//! - **References**: `$ref` into `$defs`, with unresolved and circular
//!   references rejected before any instance is checked
//! - **Formats**: pluggable `format` checkers for the common 2020-12 formats
//! - **Round trip**: parse JSON Schema documents and serialize them back
//!
//! ## Quick Start
//!
//! ```rust
//! use chez_schema::{Schema, ToJsonSchema, ValidationContext};
//! use serde_json::json;
//!
//! let schema = Schema::from_json_schema(&json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": {"type": "string", "minLength": 1},
//!         "age": {"type": "integer", "minimum": 0}
//!     }
//! }))
//! .unwrap();
//!
//! let result = chez_schema::validate(&schema, &json!({"age": -1}), &ValidationContext::new())
//!     .unwrap();
//! assert_eq!(result.errors().len(), 2);
//!
//! assert_eq!(schema.to_json_schema()["required"], json!(["name"]));
//! ```
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

pub mod document;
pub mod formats;
pub mod loader;
pub mod parser;
pub mod schema;
pub mod serializer;
pub mod validation;

// Re-export commonly used types for convenience
pub use document::{ReferenceResolver, SchemaDocument};
pub use formats::{FormatChecker, FormatRegistry};
pub use loader::{Format, LoaderConfig, LoaderError, LoaderResult, SchemaLoader};
pub use parser::{always, never, ParseOptions, SchemaParser};
pub use schema::{
    Additional, ArraySchema, BooleanSchema, Composition, EnumSchema, Metadata, NullSchema,
    NumericSchema, ObjectSchema, Pattern, Schema, SchemaError, SchemaResult, StringSchema,
    WithMetadata,
};
pub use serializer::{ToJsonSchema, DRAFT_2020_12};
pub use validation::{
    validate, CompositionDetail, CompositionKind, JsonType, RangeKind, ValidationContext,
    ValidationError, ValidationErrors, ValidationOptions, ValidationResult, Validator,
};
