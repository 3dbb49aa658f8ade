//! Reference preparation
//!
//! Before validation starts every `$ref` reachable from the root is resolved
//! once. A reference loop that never descends into a child instance (for
//! example `A -> allOf[B]` and `B -> A`) would recurse forever on any value,
//! so it is rejected here as [`SchemaError::CircularReference`]. Loops that
//! pass through `properties`, `items` and friends are ordinary recursive
//! schemas and are allowed: each step consumes one level of the instance.
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::document::ReferenceResolver;
use crate::schema::{Additional, Schema, SchemaError, SchemaResult};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Resolve every reachable pointer and reject in-place reference loops
pub(crate) fn resolve_references<'a>(
    root: &'a Schema,
    resolver: Option<&'a dyn ReferenceResolver>,
) -> SchemaResult<HashMap<String, &'a Schema>> {
    let mut pending = Vec::new();
    collect_refs(root, &mut pending);

    let mut targets: HashMap<String, &'a Schema> = HashMap::new();
    while let Some(pointer) = pending.pop() {
        if targets.contains_key(&pointer) {
            continue;
        }
        let target = resolver
            .and_then(|resolver| resolver.resolve(&pointer))
            .ok_or_else(|| SchemaError::unresolved_reference(&pointer))?;
        trace!(pointer = %pointer, target = target.kind_name(), "Resolved reference");
        collect_refs(target, &mut pending);
        targets.insert(pointer, target);
    }

    detect_cycles(root, &targets)?;
    Ok(targets)
}

/// Every `$ref` pointer anywhere below `schema`
fn collect_refs(schema: &Schema, out: &mut Vec<String>) {
    match schema {
        Schema::Ref(reference) => out.push(reference.pointer.clone()),
        Schema::Array(array) => {
            for child in array
                .prefix_items
                .iter()
                .chain(array.items.as_deref())
                .chain(array.contains.as_deref())
                .chain(additional_schema(array.unevaluated_items.as_ref()))
            {
                collect_refs(child, out);
            }
        }
        Schema::Object(object) => {
            for child in object
                .properties
                .values()
                .chain(object.pattern_properties.values())
                .chain(object.dependent_schemas.values())
                .chain(additional_schema(Some(&object.additional_properties)))
                .chain(object.property_names.as_deref())
                .chain(additional_schema(object.unevaluated_properties.as_ref()))
            {
                collect_refs(child, out);
            }
        }
        Schema::Composition(composition) => {
            for child in composition.composition.subschemas() {
                collect_refs(child, out);
            }
        }
        Schema::String(_)
        | Schema::Number(_)
        | Schema::Integer(_)
        | Schema::Boolean(_)
        | Schema::Null(_)
        | Schema::Enum(_) => {}
    }
}

fn additional_schema(policy: Option<&Additional>) -> Option<&Schema> {
    match policy {
        Some(Additional::Schema(schema)) => Some(schema.as_ref()),
        _ => None,
    }
}

/// `$ref`s that apply to the same instance as `schema` itself
///
/// Only composition branches and `dependentSchemas` keep the instance in
/// place; every other keyword descends into a member, an element or a key.
fn in_place_refs<'s>(schema: &'s Schema, out: &mut Vec<&'s str>) {
    match schema {
        Schema::Ref(reference) => out.push(reference.pointer.as_str()),
        Schema::Composition(composition) => {
            for child in composition.composition.subschemas() {
                in_place_refs(child, out);
            }
        }
        Schema::Object(object) => {
            for dependent in object.dependent_schemas.values() {
                in_place_refs(dependent, out);
            }
        }
        _ => {}
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

fn detect_cycles(root: &Schema, targets: &HashMap<String, &Schema>) -> SchemaResult<()> {
    let mut edges: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (pointer, target) in targets {
        let mut next = Vec::new();
        in_place_refs(target, &mut next);
        next.sort_unstable();
        next.dedup();
        edges.insert(pointer.as_str(), next);
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();

    // Start from the refs the root applies in place so the reported chain
    // reads from the entry point, then sweep whatever is left.
    let mut starts = Vec::new();
    in_place_refs(root, &mut starts);
    starts.extend(edges.keys().copied());

    for start in starts {
        visit(start, &edges, &mut marks, &mut stack)?;
    }
    Ok(())
}

fn visit<'e>(
    pointer: &'e str,
    edges: &BTreeMap<&'e str, Vec<&'e str>>,
    marks: &mut HashMap<&'e str, Mark>,
    stack: &mut Vec<&'e str>,
) -> SchemaResult<()> {
    match marks.get(pointer) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|p| *p == pointer).unwrap_or(0);
            let mut chain: Vec<&str> = stack[start..].to_vec();
            chain.push(pointer);
            return Err(SchemaError::circular_reference(&chain));
        }
        None => {}
    }

    marks.insert(pointer, Mark::Visiting);
    stack.push(pointer);
    if let Some(next) = edges.get(pointer) {
        for target in next {
            visit(*target, edges, marks, stack)?;
        }
    }
    stack.pop();
    marks.insert(pointer, Mark::Done);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ObjectSchema;

    fn resolve(root: &Schema, defs: &BTreeMap<String, Schema>) -> SchemaResult<usize> {
        let resolver: &dyn ReferenceResolver = defs;
        resolve_references(root, Some(resolver)).map(|targets| targets.len())
    }

    fn defs(entries: Vec<(&str, Schema)>) -> BTreeMap<String, Schema> {
        entries
            .into_iter()
            .map(|(name, schema)| (format!("#/$defs/{}", name), schema))
            .collect()
    }

    #[test]
    fn test_recursive_through_properties_is_allowed() {
        let node: Schema = ObjectSchema::new()
            .property("children", Schema::array_of(Schema::reference("#/$defs/node")))
            .into();
        let resolver = defs(vec![("node", node)]);
        let root = Schema::reference("#/$defs/node");
        assert_eq!(resolve(&root, &resolver).unwrap(), 1);
    }

    #[test]
    fn test_in_place_loop_is_rejected() {
        let resolver = defs(vec![
            ("a", Schema::all_of(vec![Schema::reference("#/$defs/b")])),
            ("b", Schema::any_of(vec![Schema::string(), Schema::reference("#/$defs/a")])),
        ]);
        let root = Schema::reference("#/$defs/a");
        let err = resolve(&root, &resolver).unwrap_err();
        assert_eq!(
            err,
            SchemaError::CircularReference {
                chain: "#/$defs/a -> #/$defs/b -> #/$defs/a".to_string()
            }
        );
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let resolver = defs(vec![("loop", Schema::reference("#/$defs/loop"))]);
        let root = Schema::reference("#/$defs/loop");
        let err = resolve(&root, &resolver).unwrap_err();
        assert!(matches!(err, SchemaError::CircularReference { .. }));
    }

    #[test]
    fn test_missing_target_is_unresolved() {
        let resolver = defs(vec![]);
        let root = Schema::not(Schema::reference("#/$defs/missing"));
        let err = resolve(&root, &resolver).unwrap_err();
        assert_eq!(err, SchemaError::unresolved_reference("#/$defs/missing"));
    }
}
