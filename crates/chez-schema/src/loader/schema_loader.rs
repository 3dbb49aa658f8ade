//! Schema loader with an mtime-checked cache
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::document::SchemaDocument;
use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::reader::{DocumentReader, Format};
use crate::parser::{ParseOptions, SchemaParser};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

/// Configuration for schema loader behavior
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Whether parsed files are cached between loads
    pub cache_enabled: bool,
    /// Maximum number of cached files
    pub max_entries: usize,
    /// Options handed to the schema parser
    pub parse: ParseOptions,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_entries: 256,
            parse: ParseOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    content: Value,
    file_mtime: SystemTime,
}

/// Loads schema documents and instance files from disk
#[derive(Debug)]
pub struct SchemaLoader {
    config: LoaderConfig,
    reader: DocumentReader,
    parser: SchemaParser,
    cache: HashMap<PathBuf, CacheEntry>,
}

impl SchemaLoader {
    /// Create a new schema loader with default configuration
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            parser: SchemaParser::with_options(config.parse.clone()),
            reader: DocumentReader::new(),
            cache: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read a JSON or YAML file as a raw value, served from cache when fresh
    pub fn load_value(&mut self, path: &Path) -> LoaderResult<Value> {
        let key = canonical(path)?;
        let mtime = modified(path)?;

        if self.config.cache_enabled {
            if let Some(entry) = self.cache.get(&key) {
                if entry.file_mtime >= mtime {
                    trace!(path = %path.display(), "schema cache hit");
                    return Ok(entry.content.clone());
                }
            }
        }

        let content = self.reader.read_file(path)?;
        debug!(path = %path.display(), "loaded document");

        if self.config.cache_enabled {
            if self.cache.len() >= self.config.max_entries && !self.cache.contains_key(&key) {
                self.evict_oldest();
            }
            self.cache.insert(
                key,
                CacheEntry {
                    content: content.clone(),
                    file_mtime: mtime,
                },
            );
        }

        Ok(content)
    }

    /// Load and parse a schema document, resolving its `$defs`
    pub fn load_document(&mut self, path: &Path) -> LoaderResult<SchemaDocument> {
        let value = self.load_value(path)?;
        let document = SchemaDocument::from_json_with(&value, &self.parser)
            .map_err(|e| LoaderError::schema_error(path.to_path_buf(), e))?;
        // Surface unresolved or circular references at load time.
        document
            .validator()
            .map_err(|e| LoaderError::schema_error(path.to_path_buf(), e))?;
        Ok(document)
    }

    /// Load several instance files, stopping at the first failure
    pub fn load_instances(&mut self, paths: &[PathBuf]) -> LoaderResult<Vec<(PathBuf, Value)>> {
        paths
            .iter()
            .map(|path| Ok((path.clone(), self.load_value(path)?)))
            .collect()
    }

    /// Render a value in the given format
    pub fn render(&self, value: &Value, format: Format) -> LoaderResult<String> {
        self.reader.serialize(value, format)
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        canonical(path)
            .map(|key| self.cache.contains_key(&key))
            .unwrap_or(false)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .cache
            .iter()
            .min_by_key(|(_, entry)| entry.file_mtime)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.cache.remove(&key);
        }
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical(path: &Path) -> LoaderResult<PathBuf> {
    path.canonicalize()
        .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))
}

fn modified(path: &Path) -> LoaderResult<SystemTime> {
    std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaError;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_document_with_defs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("person.yaml");
        fs::write(
            &path,
            r##"
$schema: https://json-schema.org/draft/2020-12/schema
$defs:
  Name:
    type: string
    minLength: 1
type: object
required: [name]
properties:
  name:
    $ref: "#/$defs/Name"
"##,
        )
        .unwrap();

        let mut loader = SchemaLoader::new();
        let document = loader.load_document(&path).unwrap();
        assert!(document.defs.contains_key("Name"));

        let result = document.validate(&json!({"name": ""})).unwrap();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_cache_hit_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instance.json");
        fs::write(&path, r#"{"a": 1}"#).unwrap();

        let mut loader = SchemaLoader::new();
        assert!(!loader.is_cached(&path));
        loader.load_value(&path).unwrap();
        assert!(loader.is_cached(&path));

        loader.clear_cache();
        assert!(!loader.is_cached(&path));
    }

    #[test]
    fn test_cache_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instance.json");
        fs::write(&path, "[1, 2]").unwrap();

        let mut loader = SchemaLoader::with_config(LoaderConfig {
            cache_enabled: false,
            ..LoaderConfig::default()
        });
        assert_eq!(loader.load_value(&path).unwrap(), json!([1, 2]));
        assert!(!loader.is_cached(&path));
    }

    #[test]
    fn test_unresolved_reference_is_schema_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r##"{"$ref": "#/$defs/Missing"}"##).unwrap();

        let err = SchemaLoader::new().load_document(&path).unwrap_err();
        match err {
            LoaderError::SchemaError { source, .. } => {
                assert!(matches!(source, SchemaError::UnresolvedReference { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_instances_reports_missing_file() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("a.json");
        fs::write(&present, "true").unwrap();
        let missing = dir.path().join("b.json");

        let mut loader = SchemaLoader::new();
        let err = loader
            .load_instances(&[present.clone(), missing.clone()])
            .unwrap_err();
        assert_eq!(err.path(), Some(&missing));

        let loaded = loader.load_instances(&[present.clone()]).unwrap();
        assert_eq!(loaded, vec![(present, json!(true))]);
    }
}
