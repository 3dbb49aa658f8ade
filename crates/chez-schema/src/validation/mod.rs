//! Validation of JSON values against a [`Schema`](crate::schema::Schema)
//!
//! Validation never stops at the first problem: every violated keyword
//! contributes a [`ValidationError`] located by a JSON pointer, and the
//! outcome is a [`ValidationResult`]. Problems with the schema itself
//! (unresolvable or looping `$ref`s) are reported separately as a
//! [`SchemaError`](crate::schema::SchemaError) when the [`Validator`] is
//! prepared.
//!
//! # Examples
//!
//! ```rust
//! use chez_schema::schema::{NumericSchema, ObjectSchema, Schema};
//! use chez_schema::validation::{ValidationContext, validate};
//! use serde_json::json;
//!
//! let schema: Schema = ObjectSchema::new()
//!     .required_property("age", NumericSchema::new().minimum(0).integer())
//!     .into();
//!
//! let result = validate(&schema, &json!({"age": -5}), &ValidationContext::new()).unwrap();
//! assert_eq!(result.errors()[0].path(), "/age");
//! ```
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

mod array;
pub mod base;
mod composition;
pub mod error;
mod object;
mod preflight;
mod scalar;
pub mod validator;

// Re-export commonly used types
pub use base::{ValidationContext, ValidationHelpers, ROOT_PATH};
pub use error::{
    CompositionDetail, CompositionKind, JsonType, RangeKind, ValidationError, ValidationErrors,
    ValidationResult,
};
pub use validator::{validate, ValidationOptions, Validator};
