//! Check command handler

use super::ensure_exists;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use chez_schema::SchemaLoader;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{instrument, warn};

/// Outcome of checking one schema document
#[derive(Debug, Serialize)]
struct CheckReport {
    schema: PathBuf,
    ok: bool,
    definitions: usize,
    error: Option<String>,
}

/// Handle the check command
#[instrument(skip_all, fields(schemas = args.schemas.len()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let mut loader = SchemaLoader::with_config(config.validation.loader_config());
    let mut reports = Vec::with_capacity(args.schemas.len());

    for path in args.schemas {
        ensure_exists(&path)?;
        let report = match loader.load_document(&path) {
            Ok(document) => {
                output.success(&format!(
                    "✓ {} ({} definition(s))",
                    path.display(),
                    document.defs.len()
                ))?;
                CheckReport {
                    schema: path,
                    ok: true,
                    definitions: document.defs.len(),
                    error: None,
                }
            }
            Err(e) => {
                warn!(schema = %path.display(), error = %e, "Schema check failed");
                output.error(&format!("✗ {}", e))?;
                CheckReport {
                    schema: path,
                    ok: false,
                    definitions: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        reports.push(report);
    }

    if output.format() != crate::cli::OutputFormat::Human {
        output.data(&reports)?;
    }

    let failed = reports.iter().filter(|report| !report.ok).count();
    if failed > 0 {
        return Err(Error::other(format!(
            "{} of {} schema(s) failed the check",
            failed,
            reports.len()
        )));
    }
    Ok(())
}
