//! Render command handler

use super::ensure_exists;
use crate::cli::RenderArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use chez_schema::SchemaLoader;
use tracing::{debug, instrument};

/// Handle the render command
#[instrument(skip_all, fields(schema = %args.schema.display(), format = ?args.format))]
pub fn handle_render(args: RenderArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("render_command");
    ensure_exists(&args.schema)?;

    let mut loader = SchemaLoader::with_config(config.validation.loader_config());
    let document = loader.load_document(&args.schema)?;
    let rendered = loader.render(&document.to_json(), args.format.into())?;
    debug!(bytes = rendered.len(), "Rendered schema document");

    match &args.output_file {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            output.success(&format!("✓ Wrote {}", path.display()))?;
        }
        None => output.writeln(rendered.trim_end())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{DocumentFormat, OutputFormat};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_render_to_file() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("tags.json");
        fs::write(&schema, r#"{"items": {"type": "string"}, "uniqueItems": true}"#).unwrap();
        let target = dir.path().join("tags.rendered.json");

        let mut output =
            OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(std::io::sink()));
        let args = RenderArgs {
            schema,
            format: DocumentFormat::Json,
            output_file: Some(target.clone()),
        };
        handle_render(args, &Config::default(), &mut output).unwrap();

        let rendered: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(rendered["$schema"], chez_schema::DRAFT_2020_12);
        assert_eq!(rendered["type"], "array");
        assert_eq!(rendered["uniqueItems"], true);
    }
}
