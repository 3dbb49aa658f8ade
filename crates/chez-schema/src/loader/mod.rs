//! Loading schema and instance documents from disk
//!
//! Files are read as JSON or YAML based on their extension and parsed into
//! [`SchemaDocument`](crate::document::SchemaDocument)s. Parsed files are
//! cached until their modification time changes.
//!
//! # Example Usage
//!
//! ```no_run
//! use chez_schema::loader::SchemaLoader;
//! use std::path::Path;
//!
//! let mut loader = SchemaLoader::new();
//! let document = loader.load_document(Path::new("person.schema.yaml"))?;
//! let instance = loader.load_value(Path::new("person.json"))?;
//! let result = document.validate(&instance)?;
//! println!("valid: {}", result.is_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod reader;
pub mod schema_loader;

pub use error::{LoaderError, LoaderResult};
pub use reader::{DocumentReader, Format};
pub use schema_loader::{LoaderConfig, SchemaLoader};
