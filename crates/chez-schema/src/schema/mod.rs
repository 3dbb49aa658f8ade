//! Schema data model
//!
//! A [`Schema`] is an immutable tree of keyword-carrying variants. Every
//! variant owns its own constraints plus the common [`Metadata`]
//! annotations. Trees are acyclic; recursion is only expressed through
//! [`RefSchema`] indirection, resolved at validation time by a
//! [`ReferenceResolver`](crate::document::ReferenceResolver).
//!
//! Schemas are normally built with the fluent constructors:
//!
//! ```rust
//! use chez_schema::schema::{ObjectSchema, Schema, StringSchema, WithMetadata};
//!
//! let user = ObjectSchema::new()
//!     .property("name", StringSchema::new().min_length(1))
//!     .required("name")
//!     .title("User");
//! let schema: Schema = user.into();
//! assert!(matches!(schema, Schema::Object(_)));
//! ```
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

pub mod array;
pub mod composition;
pub mod error;
pub mod object;
pub mod primitive;

pub use array::ArraySchema;
pub use composition::{Composition, CompositionSchema, RefSchema};
pub use error::{SchemaError, SchemaResult};
pub use object::ObjectSchema;
pub use primitive::{BooleanSchema, EnumSchema, NullSchema, NumericSchema, StringSchema};

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Default upper bound on the compiled size of a single regular expression
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A JSON Schema, as a closed set of variants
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String(StringSchema),
    Number(NumericSchema),
    Integer(NumericSchema),
    Boolean(BooleanSchema),
    Null(NullSchema),
    Enum(EnumSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    Composition(CompositionSchema),
    Ref(RefSchema),
}

/// Annotations shared by every schema variant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub examples: Vec<Value>,
}

impl Metadata {
    /// Whether no annotation is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.default.is_none()
            && self.examples.is_empty()
    }
}

/// Fluent setters for the common annotations
pub trait WithMetadata: Sized {
    /// Mutable access to the annotations
    fn metadata_mut(&mut self) -> &mut Metadata;

    fn title(mut self, title: impl Into<String>) -> Self {
        self.metadata_mut().title = Some(title.into());
        self
    }

    fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata_mut().description = Some(description.into());
        self
    }

    fn default_value(mut self, default: Value) -> Self {
        self.metadata_mut().default = Some(default);
        self
    }

    fn example(mut self, example: Value) -> Self {
        self.metadata_mut().examples.push(example);
        self
    }
}

/// Policy for members not claimed by sibling keywords
///
/// Used for `additionalProperties`, `unevaluatedProperties` and
/// `unevaluatedItems`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Additional {
    /// Any value is accepted (`true`, or the keyword is absent)
    #[default]
    AllowAny,
    /// No extra member is accepted (`false`)
    Disallowed,
    /// Extra members must validate against the schema
    Schema(Box<Schema>),
}

impl Additional {
    /// Wrap a schema
    pub fn schema(schema: impl Into<Schema>) -> Self {
        Self::Schema(Box::new(schema.into()))
    }

    pub fn is_allow_any(&self) -> bool {
        matches!(self, Self::AllowAny)
    }
}

/// A compiled regular expression that remembers its source text
///
/// Patterns are compiled when the schema is built, so a malformed regex is a
/// [`SchemaError`] long before any instance is validated. Matching is a
/// search, not a full match: `"b"` matches `"abc"`.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern with the default size limit
    pub fn new(source: impl Into<String>) -> SchemaResult<Self> {
        Self::with_size_limit(source, DEFAULT_REGEX_SIZE_LIMIT)
    }

    /// Compile a pattern, rejecting programs larger than `size_limit` bytes
    pub fn with_size_limit(source: impl Into<String>, size_limit: usize) -> SchemaResult<Self> {
        let source = source.into();
        let regex = RegexBuilder::new(&source)
            .size_limit(size_limit)
            .build()
            .map_err(|e| SchemaError::invalid_pattern(source.clone(), e))?;
        Ok(Self { source, regex })
    }

    /// The pattern as written in the schema
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Search `text` for a match anywhere
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl PartialOrd for Pattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source.cmp(&other.source)
    }
}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl Schema {
    /// An unconstrained string schema
    pub fn string() -> Self {
        Self::String(StringSchema::new())
    }

    /// An unconstrained number schema
    pub fn number() -> Self {
        Self::Number(NumericSchema::new())
    }

    /// An unconstrained integer schema
    pub fn integer() -> Self {
        Self::Integer(NumericSchema::new())
    }

    pub fn boolean() -> Self {
        Self::Boolean(BooleanSchema::new())
    }

    pub fn null() -> Self {
        Self::Null(NullSchema::new())
    }

    /// An enum over arbitrary JSON values
    pub fn enumeration(values: impl IntoIterator<Item = Value>) -> Self {
        Self::Enum(EnumSchema::new(values))
    }

    /// An enum over string literals, rendered with `"type": "string"`
    pub fn string_enum<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(EnumSchema::strings(values))
    }

    /// An array schema whose items all validate against `items`
    pub fn array_of(items: impl Into<Schema>) -> Self {
        Self::Array(ArraySchema::new().items(items))
    }

    pub fn any_of(branches: impl IntoIterator<Item = Schema>) -> Self {
        Self::Composition(CompositionSchema::new(Composition::AnyOf(
            branches.into_iter().collect(),
        )))
    }

    pub fn one_of(branches: impl IntoIterator<Item = Schema>) -> Self {
        Self::Composition(CompositionSchema::new(Composition::OneOf(
            branches.into_iter().collect(),
        )))
    }

    pub fn all_of(branches: impl IntoIterator<Item = Schema>) -> Self {
        Self::Composition(CompositionSchema::new(Composition::AllOf(
            branches.into_iter().collect(),
        )))
    }

    pub fn not(inner: impl Into<Schema>) -> Self {
        Self::Composition(CompositionSchema::new(Composition::Not(Box::new(
            inner.into(),
        ))))
    }

    /// `if`/`then`/`else`; either branch may be absent
    pub fn if_then_else(
        condition: impl Into<Schema>,
        then: Option<Schema>,
        otherwise: Option<Schema>,
    ) -> Self {
        Self::Composition(CompositionSchema::new(Composition::IfThenElse {
            condition: Box::new(condition.into()),
            then: then.map(Box::new),
            otherwise: otherwise.map(Box::new),
        }))
    }

    /// A `$ref` to another schema, e.g. `#/$defs/User`
    pub fn reference(pointer: impl Into<String>) -> Self {
        Self::Ref(RefSchema::new(pointer))
    }

    /// The annotations of whichever variant this is
    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::String(s) => &s.metadata,
            Self::Number(s) | Self::Integer(s) => &s.metadata,
            Self::Boolean(s) => &s.metadata,
            Self::Null(s) => &s.metadata,
            Self::Enum(s) => &s.metadata,
            Self::Array(s) => &s.metadata,
            Self::Object(s) => &s.metadata,
            Self::Composition(s) => &s.metadata,
            Self::Ref(s) => &s.metadata,
        }
    }

    /// Short name of the variant, used in logs and diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Null(_) => "null",
            Self::Enum(_) => "enum",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Composition(c) => c.composition.keyword(),
            Self::Ref(_) => "$ref",
        }
    }
}

impl WithMetadata for Schema {
    fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Self::String(s) => &mut s.metadata,
            Self::Number(s) | Self::Integer(s) => &mut s.metadata,
            Self::Boolean(s) => &mut s.metadata,
            Self::Null(s) => &mut s.metadata,
            Self::Enum(s) => &mut s.metadata,
            Self::Array(s) => &mut s.metadata,
            Self::Object(s) => &mut s.metadata,
            Self::Composition(s) => &mut s.metadata,
            Self::Ref(s) => &mut s.metadata,
        }
    }
}

macro_rules! impl_metadata_and_into {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl WithMetadata for $ty {
                fn metadata_mut(&mut self) -> &mut Metadata {
                    &mut self.metadata
                }
            }

            impl From<$ty> for Schema {
                fn from(schema: $ty) -> Self {
                    Schema::$variant(schema)
                }
            }
        )*
    };
}

impl_metadata_and_into! {
    StringSchema => String,
    BooleanSchema => Boolean,
    NullSchema => Null,
    EnumSchema => Enum,
    ArraySchema => Array,
    ObjectSchema => Object,
    CompositionSchema => Composition,
    RefSchema => Ref,
}

// Numbers and integers share one struct, so the conversion is explicit.
impl WithMetadata for NumericSchema {
    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
