//! Parsing JSON Schema 2020-12 documents into [`Schema`] trees
//!
//! The parser is the inverse of the [serializer](crate::serializer): every
//! rendered schema parses back into an equal tree. Documents written by hand
//! are accepted too, with a few normalisations:
//!
//! - a `type` array becomes an `anyOf` over the named types
//! - `enum` next to `"type": "string"` becomes a string-only enum
//! - a `const` without `type` becomes a single-value enum
//! - composition keywords next to typed keywords become an `allOf` of the
//!   typed schema followed by each composition
//! - without `type`, the type is inferred from the keywords present
//! - `true`/`{}` accept anything, `false` accepts nothing
//!
//! Unknown keywords (`$comment`, `$id`, vendor extensions) are ignored.
//! Errors carry the schema location as a `#/...` pointer.
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::schema::{
    Additional, ArraySchema, BooleanSchema, Composition, CompositionSchema, EnumSchema, Metadata,
    NullSchema, NumericSchema, ObjectSchema, Pattern, RefSchema, Schema, SchemaError,
    SchemaResult, StringSchema, WithMetadata, DEFAULT_REGEX_SIZE_LIMIT,
};
use crate::validation::base::escape_segment;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

const STRING_KEYWORDS: &[&str] = &["minLength", "maxLength", "pattern", "format"];
const NUMERIC_KEYWORDS: &[&str] = &[
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
];
const ARRAY_KEYWORDS: &[&str] = &[
    "items",
    "prefixItems",
    "minItems",
    "maxItems",
    "uniqueItems",
    "contains",
    "minContains",
    "maxContains",
    "unevaluatedItems",
];
const OBJECT_KEYWORDS: &[&str] = &[
    "properties",
    "required",
    "minProperties",
    "maxProperties",
    "additionalProperties",
    "patternProperties",
    "propertyNames",
    "dependentRequired",
    "dependentSchemas",
    "unevaluatedProperties",
];

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Upper bound on the compiled size of each `pattern` regex
    pub regex_size_limit: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

/// Converts JSON Schema documents into [`Schema`] values
#[derive(Debug, Clone, Default)]
pub struct SchemaParser {
    options: ParseOptions,
}

impl SchemaParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a whole document; `$defs` and `$schema` are ignored here
    pub fn parse(&self, document: &Value) -> SchemaResult<Schema> {
        self.parse_at(document, "#")
    }

    /// Parse a sub-document whose location is `path`
    pub fn parse_at(&self, node: &Value, path: &str) -> SchemaResult<Schema> {
        match node {
            Value::Bool(true) => Ok(always()),
            Value::Bool(false) => Ok(never()),
            Value::Object(keywords) => self.parse_object(keywords, path),
            other => Err(SchemaError::unsupported(
                path,
                format!("expected an object or a boolean, found {}", json_kind(other)),
            )),
        }
    }

    fn parse_object(&self, keywords: &Map<String, Value>, path: &str) -> SchemaResult<Schema> {
        let metadata = parse_metadata(keywords, path)?;

        // Keywords next to `$ref` still apply, so the reference is one more allOf part.
        let mut parts = Vec::new();
        if let Some(pointer) = keywords.get("$ref") {
            let pointer = pointer
                .as_str()
                .ok_or_else(|| SchemaError::invalid_keyword(path, "$ref", "expected a string"))?;
            trace!(path, pointer, "Parsed reference");
            parts.push(Schema::Ref(RefSchema::new(pointer)));
        }
        if let Some(typed) = self.parse_typed(keywords, path)? {
            parts.push(typed);
        }
        for composition in self.parse_compositions(keywords, path)? {
            parts.push(Schema::Composition(CompositionSchema::new(composition)));
        }

        let mut schema = match parts.len() {
            0 => always(),
            1 => parts.remove(0),
            _ => Schema::all_of(parts),
        };
        *schema.metadata_mut() = metadata;
        Ok(schema)
    }

    /// The `type`-driven part of a schema object, if it has one
    fn parse_typed(
        &self,
        keywords: &Map<String, Value>,
        path: &str,
    ) -> SchemaResult<Option<Schema>> {
        if let Some(values) = keywords.get("enum") {
            let values = values
                .as_array()
                .ok_or_else(|| SchemaError::invalid_keyword(path, "enum", "expected an array"))?;
            let string_only = keywords.get("type").and_then(Value::as_str) == Some("string")
                && values.iter().all(Value::is_string);
            return Ok(Some(Schema::Enum(EnumSchema {
                values: values.clone(),
                string_only,
                metadata: Metadata::default(),
            })));
        }

        match keywords.get("type") {
            Some(Value::String(name)) => self.parse_type(name, keywords, path).map(Some),
            Some(Value::Array(names)) => {
                let mut branches = Vec::with_capacity(names.len());
                for name in names {
                    let name = name.as_str().ok_or_else(|| {
                        SchemaError::invalid_keyword(path, "type", "expected type names")
                    })?;
                    branches.push(self.parse_type(name, keywords, path)?);
                }
                Ok(Some(match branches.len() {
                    1 => branches.remove(0),
                    _ => Schema::any_of(branches),
                }))
            }
            Some(_) => Err(SchemaError::invalid_keyword(
                path,
                "type",
                "expected a string or an array of strings",
            )),
            None => {
                if let Some(value) = keywords.get("const") {
                    return Ok(Some(Schema::enumeration(vec![value.clone()])));
                }
                match inferred_type(keywords) {
                    Some(name) => self.parse_type(name, keywords, path).map(Some),
                    None => Ok(None),
                }
            }
        }
    }

    fn parse_type(
        &self,
        name: &str,
        keywords: &Map<String, Value>,
        path: &str,
    ) -> SchemaResult<Schema> {
        match name {
            "string" => self.parse_string(keywords, path).map(Schema::String),
            "number" => parse_numeric(keywords, path).map(Schema::Number),
            "integer" => parse_numeric(keywords, path).map(Schema::Integer),
            "boolean" => {
                let const_value = match keywords.get("const") {
                    None => None,
                    Some(Value::Bool(flag)) => Some(*flag),
                    Some(_) => {
                        return Err(SchemaError::invalid_keyword(
                            path,
                            "const",
                            "expected a boolean",
                        ))
                    }
                };
                Ok(Schema::Boolean(BooleanSchema {
                    const_value,
                    metadata: Metadata::default(),
                }))
            }
            "null" => Ok(with_const(Schema::Null(NullSchema::new()), keywords)),
            "array" => {
                let array = self.parse_array(keywords, path)?;
                Ok(with_const(Schema::Array(array), keywords))
            }
            "object" => {
                let object = self.parse_object_keywords(keywords, path)?;
                Ok(with_const(Schema::Object(object), keywords))
            }
            other => Err(SchemaError::invalid_keyword(
                path,
                "type",
                format!("unknown type '{}'", other),
            )),
        }
    }

    fn parse_string(
        &self,
        keywords: &Map<String, Value>,
        path: &str,
    ) -> SchemaResult<StringSchema> {
        let pattern = match optional_str(keywords, "pattern", path)? {
            Some(source) => Some(Pattern::with_size_limit(source, self.options.regex_size_limit)?),
            None => None,
        };
        let const_value = match keywords.get("const") {
            None => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => return Err(SchemaError::invalid_keyword(path, "const", "expected a string")),
        };
        Ok(StringSchema {
            min_length: optional_usize(keywords, "minLength", path)?,
            max_length: optional_usize(keywords, "maxLength", path)?,
            pattern,
            format: optional_str(keywords, "format", path)?.map(str::to_string),
            const_value,
            metadata: Metadata::default(),
        })
    }

    fn parse_array(&self, keywords: &Map<String, Value>, path: &str) -> SchemaResult<ArraySchema> {
        let items = match keywords.get("items") {
            None | Some(Value::Bool(true)) => None,
            Some(Value::Array(_)) => {
                return Err(SchemaError::invalid_keyword(
                    path,
                    "items",
                    "the array form of items is not supported, use prefixItems",
                ))
            }
            Some(node) => Some(Box::new(self.parse_at(node, &child_path(path, "items"))?)),
        };
        let prefix_items = match keywords.get("prefixItems") {
            None => Vec::new(),
            Some(Value::Array(nodes)) => self.parse_list(nodes, &child_path(path, "prefixItems"))?,
            Some(_) => {
                return Err(SchemaError::invalid_keyword(path, "prefixItems", "expected an array"))
            }
        };
        let unique_items = match keywords.get("uniqueItems") {
            None => false,
            Some(Value::Bool(unique)) => *unique,
            Some(_) => {
                return Err(SchemaError::invalid_keyword(path, "uniqueItems", "expected a boolean"))
            }
        };
        Ok(ArraySchema {
            items,
            prefix_items,
            min_items: optional_usize(keywords, "minItems", path)?,
            max_items: optional_usize(keywords, "maxItems", path)?,
            unique_items,
            contains: self.optional_schema(keywords, "contains", path)?,
            min_contains: optional_usize(keywords, "minContains", path)?,
            max_contains: optional_usize(keywords, "maxContains", path)?,
            unevaluated_items: self.optional_additional(keywords, "unevaluatedItems", path)?,
            metadata: Metadata::default(),
        })
    }

    fn parse_object_keywords(
        &self,
        keywords: &Map<String, Value>,
        path: &str,
    ) -> SchemaResult<ObjectSchema> {
        let mut properties = BTreeMap::new();
        for (name, node) in optional_map(keywords, "properties", path)? {
            let location = child_path(&child_path(path, "properties"), name);
            properties.insert(name.clone(), self.parse_at(node, &location)?);
        }

        let required = optional_string_set(keywords, "required", path)?;

        let mut pattern_properties = BTreeMap::new();
        for (source, node) in optional_map(keywords, "patternProperties", path)? {
            let pattern = Pattern::with_size_limit(source.clone(), self.options.regex_size_limit)?;
            let location = child_path(&child_path(path, "patternProperties"), source);
            pattern_properties.insert(pattern, self.parse_at(node, &location)?);
        }

        let mut dependent_required = BTreeMap::new();
        for (trigger, names) in optional_map(keywords, "dependentRequired", path)? {
            let location = child_path(&child_path(path, "dependentRequired"), trigger);
            dependent_required.insert(
                trigger.clone(),
                string_set(names, "dependentRequired", &location)?,
            );
        }

        let mut dependent_schemas = BTreeMap::new();
        for (trigger, node) in optional_map(keywords, "dependentSchemas", path)? {
            let location = child_path(&child_path(path, "dependentSchemas"), trigger);
            dependent_schemas.insert(trigger.clone(), self.parse_at(node, &location)?);
        }

        Ok(ObjectSchema {
            properties,
            required,
            min_properties: optional_usize(keywords, "minProperties", path)?,
            max_properties: optional_usize(keywords, "maxProperties", path)?,
            additional_properties: self
                .optional_additional(keywords, "additionalProperties", path)?
                .unwrap_or_default(),
            pattern_properties,
            property_names: self.optional_schema(keywords, "propertyNames", path)?,
            dependent_required,
            dependent_schemas,
            unevaluated_properties: self.optional_additional(
                keywords,
                "unevaluatedProperties",
                path,
            )?,
            metadata: Metadata::default(),
        })
    }

    /// Composition keywords in a fixed order: allOf, anyOf, oneOf, not, if
    fn parse_compositions(
        &self,
        keywords: &Map<String, Value>,
        path: &str,
    ) -> SchemaResult<Vec<Composition>> {
        let mut compositions = Vec::new();
        for keyword in ["allOf", "anyOf", "oneOf"] {
            let Some(node) = keywords.get(keyword) else {
                continue;
            };
            let branches = match node {
                Value::Array(nodes) => self.parse_list(nodes, &child_path(path, keyword))?,
                _ => return Err(SchemaError::invalid_keyword(path, keyword, "expected an array")),
            };
            compositions.push(match keyword {
                "allOf" => Composition::AllOf(branches),
                "anyOf" => Composition::AnyOf(branches),
                _ => Composition::OneOf(branches),
            });
        }

        if let Some(inner) = self.optional_schema(keywords, "not", path)? {
            compositions.push(Composition::Not(inner));
        }

        if let Some(condition) = self.optional_schema(keywords, "if", path)? {
            compositions.push(Composition::IfThenElse {
                condition,
                then: self.optional_schema(keywords, "then", path)?,
                otherwise: self.optional_schema(keywords, "else", path)?,
            });
        }
        Ok(compositions)
    }

    fn parse_list(&self, nodes: &[Value], path: &str) -> SchemaResult<Vec<Schema>> {
        nodes
            .iter()
            .enumerate()
            .map(|(index, node)| self.parse_at(node, &child_path(path, &index.to_string())))
            .collect()
    }

    fn optional_schema(
        &self,
        keywords: &Map<String, Value>,
        keyword: &str,
        path: &str,
    ) -> SchemaResult<Option<Box<Schema>>> {
        match keywords.get(keyword) {
            Some(node) => Ok(Some(Box::new(self.parse_at(node, &child_path(path, keyword))?))),
            None => Ok(None),
        }
    }

    fn optional_additional(
        &self,
        keywords: &Map<String, Value>,
        keyword: &str,
        path: &str,
    ) -> SchemaResult<Option<Additional>> {
        let policy = match keywords.get(keyword) {
            None => return Ok(None),
            Some(Value::Bool(true)) => Additional::AllowAny,
            Some(Value::Bool(false)) => Additional::Disallowed,
            Some(Value::Object(map)) if map.is_empty() => Additional::AllowAny,
            Some(node) => {
                Additional::Schema(Box::new(self.parse_at(node, &child_path(path, keyword))?))
            }
        };
        Ok(Some(policy))
    }
}

impl Schema {
    /// Parse a JSON Schema document with default options
    pub fn from_json_schema(document: &Value) -> SchemaResult<Self> {
        SchemaParser::new().parse(document)
    }
}

/// A schema accepting every value (`true`, `{}`)
pub fn always() -> Schema {
    Schema::all_of(Vec::new())
}

/// A schema rejecting every value (`false`)
pub fn never() -> Schema {
    Schema::not(always())
}

fn parse_metadata(keywords: &Map<String, Value>, path: &str) -> SchemaResult<Metadata> {
    let examples = match keywords.get("examples") {
        None => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(_) => return Err(SchemaError::invalid_keyword(path, "examples", "expected an array")),
    };
    Ok(Metadata {
        title: optional_str(keywords, "title", path)?.map(str::to_string),
        description: optional_str(keywords, "description", path)?.map(str::to_string),
        default: keywords.get("default").cloned(),
        examples,
    })
}

fn parse_numeric(keywords: &Map<String, Value>, path: &str) -> SchemaResult<NumericSchema> {
    let multiple_of = optional_number(keywords, "multipleOf", path)?;
    if let Some(divisor) = &multiple_of {
        if !divisor.as_f64().is_some_and(|d| d > 0.0) {
            return Err(SchemaError::invalid_keyword(
                path,
                "multipleOf",
                format!("expected a number greater than 0, found {}", divisor),
            ));
        }
    }

    Ok(NumericSchema {
        minimum: optional_number(keywords, "minimum", path)?,
        maximum: optional_number(keywords, "maximum", path)?,
        exclusive_minimum: optional_number(keywords, "exclusiveMinimum", path)?,
        exclusive_maximum: optional_number(keywords, "exclusiveMaximum", path)?,
        multiple_of,
        const_value: optional_number(keywords, "const", path)?,
        metadata: Metadata::default(),
    })
}

/// Pair a schema that has no const field of its own with a one-value enum
fn with_const(typed: Schema, keywords: &Map<String, Value>) -> Schema {
    match keywords.get("const") {
        Some(value) => Schema::all_of(vec![typed, Schema::enumeration(vec![value.clone()])]),
        None => typed,
    }
}

fn inferred_type(keywords: &Map<String, Value>) -> Option<&'static str> {
    let has_any = |names: &[&str]| names.iter().any(|name| keywords.contains_key(*name));
    if has_any(OBJECT_KEYWORDS) {
        Some("object")
    } else if has_any(ARRAY_KEYWORDS) {
        Some("array")
    } else if has_any(STRING_KEYWORDS) {
        Some("string")
    } else if has_any(NUMERIC_KEYWORDS) {
        Some("number")
    } else {
        None
    }
}

fn child_path(path: &str, segment: &str) -> String {
    format!("{}/{}", path, escape_segment(segment))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn optional_str<'v>(
    keywords: &'v Map<String, Value>,
    keyword: &str,
    path: &str,
) -> SchemaResult<Option<&'v str>> {
    match keywords.get(keyword) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(SchemaError::invalid_keyword(path, keyword, "expected a string")),
    }
}

fn optional_usize(
    keywords: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> SchemaResult<Option<usize>> {
    let Some(value) = keywords.get(keyword) else {
        return Ok(None);
    };
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
        .and_then(|n| usize::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| {
            SchemaError::invalid_keyword(path, keyword, "expected a non-negative integer")
        })
}

fn optional_number(
    keywords: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> SchemaResult<Option<Number>> {
    match keywords.get(keyword) {
        None => Ok(None),
        Some(Value::Number(number)) => Ok(Some(number.clone())),
        Some(_) => Err(SchemaError::invalid_keyword(path, keyword, "expected a number")),
    }
}

fn optional_map<'v>(
    keywords: &'v Map<String, Value>,
    keyword: &str,
    path: &str,
) -> SchemaResult<Vec<(&'v String, &'v Value)>> {
    match keywords.get(keyword) {
        None => Ok(Vec::new()),
        Some(Value::Object(map)) => Ok(map.iter().collect()),
        Some(_) => Err(SchemaError::invalid_keyword(path, keyword, "expected an object")),
    }
}

fn optional_string_set(
    keywords: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> SchemaResult<BTreeSet<String>> {
    match keywords.get(keyword) {
        None => Ok(BTreeSet::new()),
        Some(value) => string_set(value, keyword, path),
    }
}

fn string_set(value: &Value, keyword: &str, path: &str) -> SchemaResult<BTreeSet<String>> {
    let invalid = || SchemaError::invalid_keyword(path, keyword, "expected an array of strings");
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|name| name.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}
