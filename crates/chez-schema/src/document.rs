//! Schema documents and `$ref` resolution
//!
//! A [`SchemaDocument`] is a root schema plus its `$defs`. It acts as the
//! [`ReferenceResolver`] for validators built from it, answering pointers of
//! the forms:
//!
//! - `#` (the root itself)
//! - `#/$defs/<name>` (also `#/definitions/<name>`)
//! - deeper pointers that walk schema keywords, e.g.
//!   `#/properties/address/properties/street` or `#/$defs/Node/items`
//!
//! Pointer segments use JSON pointer escaping (`~0` for `~`, `~1` for `/`).
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::parser::SchemaParser;
use crate::schema::{Additional, Composition, Schema, SchemaError, SchemaResult};
use crate::serializer::{render_keywords, ToJsonSchema, DRAFT_2020_12};
use crate::validation::base::{escape_segment, unescape_segment};
use crate::validation::{ValidationResult, Validator};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Looks up the target of a `$ref` pointer
pub trait ReferenceResolver {
    fn resolve(&self, pointer: &str) -> Option<&Schema>;
}

/// Exact-match registry keyed by full pointer
impl ReferenceResolver for BTreeMap<String, Schema> {
    fn resolve(&self, pointer: &str) -> Option<&Schema> {
        self.get(pointer)
    }
}

impl ReferenceResolver for HashMap<String, Schema> {
    fn resolve(&self, pointer: &str) -> Option<&Schema> {
        self.get(pointer)
    }
}

/// A root schema with named definitions
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// `$id`, when the document declares one
    pub id: Option<String>,
    pub root: Schema,
    pub defs: BTreeMap<String, Schema>,
    /// Targets of deep `$ref` pointers, parsed from the source document
    located: BTreeMap<String, Schema>,
}

impl SchemaDocument {
    pub fn new(root: Schema) -> Self {
        Self {
            id: None,
            root,
            defs: BTreeMap::new(),
            located: BTreeMap::new(),
        }
    }

    /// Add a definition reachable as `#/$defs/<name>`
    pub fn with_def(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.defs.insert(name.into(), schema.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Parse a document with the default parser
    pub fn from_json(document: &Value) -> SchemaResult<Self> {
        Self::from_json_with(document, &SchemaParser::new())
    }

    /// Parse a document, its `$defs` and every deep `$ref` target
    pub fn from_json_with(document: &Value, parser: &SchemaParser) -> SchemaResult<Self> {
        let root = parser.parse(document)?;
        let mut defs = BTreeMap::new();
        let mut id = None;

        if let Value::Object(keywords) = document {
            if let Some(dialect) = keywords.get("$schema").and_then(Value::as_str) {
                if dialect != DRAFT_2020_12 {
                    warn!(dialect, "Schema declares a different dialect; reading it as 2020-12");
                }
            }
            id = keywords.get("$id").and_then(Value::as_str).map(str::to_string);

            for keyword in ["definitions", "$defs"] {
                let Some(section) = keywords.get(keyword) else {
                    continue;
                };
                let section = section.as_object().ok_or_else(|| {
                    SchemaError::invalid_keyword("#", keyword, "expected an object")
                })?;
                for (name, node) in section {
                    let location = format!("#/{}/{}", keyword, escape_segment(name));
                    defs.insert(name.clone(), parser.parse_at(node, &location)?);
                }
            }
        }

        let mut document_schema = Self {
            id,
            root,
            defs,
            located: BTreeMap::new(),
        };
        document_schema.locate_deep_references(document, parser)?;
        debug!(
            defs = document_schema.defs.len(),
            located = document_schema.located.len(),
            "Loaded schema document"
        );
        Ok(document_schema)
    }

    /// Parse the source node of every `$ref` that is not `#` or a plain
    /// definition, until no new pointer turns up
    fn locate_deep_references(
        &mut self,
        source: &Value,
        parser: &SchemaParser,
    ) -> SchemaResult<()> {
        let mut pending = Vec::new();
        collect_pointers(&self.root, &mut pending);
        for def in self.defs.values() {
            collect_pointers(def, &mut pending);
        }

        while let Some(pointer) = pending.pop() {
            if self.located.contains_key(&pointer) || self.is_shallow(&pointer) {
                continue;
            }
            let Some(fragment) = pointer.strip_prefix('#') else {
                continue;
            };
            let Some(node) = source.pointer(fragment) else {
                continue;
            };
            let schema = parser.parse_at(node, &pointer)?;
            collect_pointers(&schema, &mut pending);
            self.located.insert(pointer, schema);
        }
        Ok(())
    }

    fn is_shallow(&self, pointer: &str) -> bool {
        matches!(pointer, "#" | "#/")
            || definition_name(pointer)
                .is_some_and(|(name, rest)| rest.is_empty() && self.defs.contains_key(&name))
    }

    /// Render as a standalone 2020-12 document with `$schema` and `$defs`
    pub fn to_json(&self) -> Value {
        let mut rendered = render_keywords(&self.root);
        rendered.insert("$schema".into(), Value::String(DRAFT_2020_12.to_string()));
        if let Some(id) = &self.id {
            rendered.insert("$id".into(), Value::String(id.clone()));
        }
        if !self.defs.is_empty() {
            let defs: Map<String, Value> = self
                .defs
                .iter()
                .map(|(name, schema)| (name.clone(), schema.to_json_schema()))
                .collect();
            rendered.insert("$defs".into(), Value::Object(defs));
        }
        Value::Object(rendered)
    }

    /// A validator for the root schema resolving against this document
    pub fn validator(&self) -> SchemaResult<Validator<'_>> {
        Validator::with_resolver(&self.root, self)
    }

    pub fn validate(&self, value: &Value) -> SchemaResult<ValidationResult> {
        Ok(self.validator()?.validate(value))
    }
}

impl ReferenceResolver for SchemaDocument {
    fn resolve(&self, pointer: &str) -> Option<&Schema> {
        if matches!(pointer, "#" | "#/") {
            return Some(&self.root);
        }
        if let Some(schema) = self.located.get(pointer) {
            return Some(schema);
        }
        let fragment = pointer.strip_prefix("#/")?;
        let segments: Vec<String> = fragment.split('/').map(unescape_segment).collect();
        match definition_name(pointer) {
            Some((name, _)) => walk(self.defs.get(&name)?, &segments[2..]),
            None => walk(&self.root, &segments),
        }
    }
}

/// `#/$defs/<name>/<rest>` split into the unescaped name and the rest
fn definition_name(pointer: &str) -> Option<(String, &str)> {
    let fragment = pointer
        .strip_prefix("#/$defs/")
        .or_else(|| pointer.strip_prefix("#/definitions/"))?;
    let (name, rest) = fragment.split_once('/').unwrap_or((fragment, ""));
    Some((unescape_segment(name), rest))
}

fn collect_pointers(schema: &Schema, out: &mut Vec<String>) {
    if let Schema::Ref(reference) = schema {
        out.push(reference.pointer.clone());
        return;
    }
    for child in children(schema) {
        collect_pointers(child, out);
    }
}

fn children(schema: &Schema) -> Vec<&Schema> {
    fn additional(policy: Option<&Additional>) -> Option<&Schema> {
        match policy {
            Some(Additional::Schema(schema)) => Some(schema.as_ref()),
            _ => None,
        }
    }

    match schema {
        Schema::Array(array) => array
            .prefix_items
            .iter()
            .chain(array.items.as_deref())
            .chain(array.contains.as_deref())
            .chain(additional(array.unevaluated_items.as_ref()))
            .collect(),
        Schema::Object(object) => object
            .properties
            .values()
            .chain(object.pattern_properties.values())
            .chain(additional(Some(&object.additional_properties)))
            .chain(object.property_names.as_deref())
            .chain(object.dependent_schemas.values())
            .chain(additional(object.unevaluated_properties.as_ref()))
            .collect(),
        Schema::Composition(composition) => composition.composition.subschemas(),
        _ => Vec::new(),
    }
}

/// Follow keyword segments down from `schema`
fn walk<'s>(schema: &'s Schema, segments: &[String]) -> Option<&'s Schema> {
    let Some((keyword, rest)) = segments.split_first() else {
        return Some(schema);
    };
    let direct = step(schema, keyword, rest);
    if direct.is_some() {
        return direct;
    }
    // A typed schema mixed with compositions parses as allOf([typed, ...]);
    // its keywords live on one of the branches.
    match schema {
        Schema::Composition(composition) => match &composition.composition {
            Composition::AllOf(branches) => {
                branches.iter().find_map(|branch| walk(branch, segments))
            }
            _ => None,
        },
        _ => None,
    }
}

fn step<'s>(schema: &'s Schema, keyword: &str, rest: &[String]) -> Option<&'s Schema> {
    let named = |rest: &[String]| {
        rest.split_first()
            .map(|(name, tail)| (name.clone(), tail.to_vec()))
    };
    let indexed = |rest: &[String]| {
        let (index, tail) = rest.split_first()?;
        Some((index.parse::<usize>().ok()?, tail.to_vec()))
    };
    let additional = |policy: &'s Additional| match policy {
        Additional::Schema(schema) => Some(schema.as_ref()),
        _ => None,
    };

    match (schema, keyword) {
        (Schema::Object(object), "properties") => {
            let (name, tail) = named(rest)?;
            walk(object.properties.get(&name)?, &tail)
        }
        (Schema::Object(object), "patternProperties") => {
            let (source, tail) = named(rest)?;
            let (_, target) = object
                .pattern_properties
                .iter()
                .find(|(pattern, _)| pattern.as_str() == source)?;
            walk(target, &tail)
        }
        (Schema::Object(object), "dependentSchemas") => {
            let (name, tail) = named(rest)?;
            walk(object.dependent_schemas.get(&name)?, &tail)
        }
        (Schema::Object(object), "additionalProperties") => {
            walk(additional(&object.additional_properties)?, rest)
        }
        (Schema::Object(object), "unevaluatedProperties") => {
            walk(additional(object.unevaluated_properties.as_ref()?)?, rest)
        }
        (Schema::Object(object), "propertyNames") => walk(object.property_names.as_deref()?, rest),
        (Schema::Array(array), "items") => walk(array.items.as_deref()?, rest),
        (Schema::Array(array), "prefixItems") => {
            let (index, tail) = indexed(rest)?;
            walk(array.prefix_items.get(index)?, &tail)
        }
        (Schema::Array(array), "contains") => walk(array.contains.as_deref()?, rest),
        (Schema::Array(array), "unevaluatedItems") => {
            walk(additional(array.unevaluated_items.as_ref()?)?, rest)
        }
        (Schema::Composition(composition), keyword) => match (&composition.composition, keyword) {
            (Composition::AllOf(branches), "allOf")
            | (Composition::AnyOf(branches), "anyOf")
            | (Composition::OneOf(branches), "oneOf") => {
                let (index, tail) = indexed(rest)?;
                walk(branches.get(index)?, &tail)
            }
            (Composition::Not(inner), "not") => walk(inner, rest),
            (Composition::IfThenElse { condition, .. }, "if") => walk(condition, rest),
            (Composition::IfThenElse { then, .. }, "then") => walk(then.as_deref()?, rest),
            (Composition::IfThenElse { otherwise, .. }, "else") => {
                walk(otherwise.as_deref()?, rest)
            }
            _ => None,
        },
        _ => None,
    }
}
