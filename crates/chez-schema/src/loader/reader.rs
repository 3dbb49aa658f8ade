//! Reading JSON and YAML documents into `serde_json::Value`
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(LoaderError::unsupported_format(path.to_path_buf())),
        }
    }

    /// Get the primary file extension for this format
    pub fn primary_extension(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
        }
    }
}

/// Parses document text in either supported format
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentReader;

impl DocumentReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a file, detecting the format from its extension
    pub fn read_file(&self, path: &Path) -> LoaderResult<Value> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;
        self.parse_content(&content, format, path)
    }

    /// Parse content with an explicit format
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<Value> {
        match format {
            Format::Yaml => self.parse_yaml(content, path),
            Format::Json => self.parse_json(content, path),
        }
    }

    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        // Parse as YAML first so YAML-specific errors keep their location.
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e))?;

        serde_json::to_value(yaml_value)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_json::from_str(content)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    /// Parse content of unknown format: extension first, then JSON, then YAML
    pub fn parse_with_fallback(&self, content: &str, path: &Path) -> LoaderResult<(Value, Format)> {
        if let Ok(format) = Format::from_path(path) {
            if let Ok(value) = self.parse_content(content, format, path) {
                return Ok((value, format));
            }
        }

        if let Ok(value) = self.parse_json(content, path) {
            return Ok((value, Format::Json));
        }

        if let Ok(value) = self.parse_yaml(content, path) {
            return Ok((value, Format::Yaml));
        }

        Err(LoaderError::unsupported_format(path.to_path_buf()))
    }

    /// Render a value as pretty JSON or YAML text
    pub fn serialize(&self, value: &Value, format: Format) -> LoaderResult<String> {
        match format {
            Format::Json => serde_json::to_string_pretty(value)
                .map_err(|e| {
                    LoaderError::serialize_error(format!("Failed to serialize JSON: {}", e))
                }),
            Format::Yaml => serde_yaml::to_string(value)
                .map_err(|e| {
                    LoaderError::serialize_error(format!("Failed to serialize YAML: {}", e))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("schema.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("schema.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("schema.json")).unwrap(), Format::Json);

        assert!(Format::from_path(Path::new("schema.txt")).is_err());
        assert!(Format::from_path(Path::new("schema")).is_err());
    }

    #[test]
    fn test_yaml_file() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("user.yaml");

        let yaml_content = r#"
type: object
required: [name]
properties:
  name:
    type: string
    minLength: 1
"#;
        fs::write(&file_path, yaml_content).unwrap();

        let value = DocumentReader::new().read_file(&file_path)?;
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["name"]["minLength"], 1);
        Ok(())
    }

    #[test]
    fn test_json_file() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("instance.json");
        fs::write(&file_path, r#"{"name": "Ada", "tags": ["a", "b"]}"#).unwrap();

        let value = DocumentReader::new().read_file(&file_path)?;
        assert_eq!(value, json!({"name": "Ada", "tags": ["a", "b"]}));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DocumentReader::new()
            .read_file(Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::IoError { .. }));
    }

    #[test]
    fn test_fallback_parsing() -> LoaderResult<()> {
        let reader = DocumentReader::new();

        let (value, format) =
            reader.parse_with_fallback(r#"{"type": "string"}"#, Path::new("stdin"))?;
        assert_eq!(format, Format::Json);
        assert_eq!(value["type"], "string");

        let (value, format) =
            reader.parse_with_fallback("type: integer\nminimum: 0", Path::new("stdin"))?;
        assert_eq!(format, Format::Yaml);
        assert_eq!(value["minimum"], 0);
        Ok(())
    }

    #[test]
    fn test_serialization() -> LoaderResult<()> {
        let reader = DocumentReader::new();
        let value = json!({"type": "array", "minItems": 1});

        let json_str = reader.serialize(&value, Format::Json)?;
        assert!(json_str.contains("\"minItems\": 1"));

        let yaml_str = reader.serialize(&value, Format::Yaml)?;
        assert!(yaml_str.contains("type: array"));
        Ok(())
    }
}
