//! Validation command handler

use super::ensure_exists;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{InstanceReport, OutputWriter, ValidationReport};
use chez_schema::SchemaLoader;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip_all, fields(schema = %args.schema.display(), instances = args.instances.len()))]
pub fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details(
        "validate_command",
        &format!("schema: {}", args.schema.display()),
    );
    ensure_exists(&args.schema)?;

    let mut loader = SchemaLoader::with_config(config.validation.loader_config());
    let document = {
        let _loading_timer = Timer::new("schema_loading");
        loader.load_document(&args.schema)?
    };

    let mut options = config.validation.validation_options();
    if args.no_formats {
        options = options.without_format_assertions();
    }
    let validator = document.validator()?.with_options(options);

    output.info(&format!(
        "Validating {} instance(s) against {}",
        args.instances.len(),
        args.schema.display()
    ))?;

    let progress = output.progress_bar(args.instances.len() as u64, "Validating");
    let mut report = ValidationReport::new(args.schema.clone());
    for path in &args.instances {
        ensure_exists(path)?;
        let instance = loader.load_value(path)?;
        let errors = validator.validate(&instance).into_errors();
        debug!(instance = %path.display(), errors = errors.len(), "Validated instance");

        let valid = errors.is_empty();
        report.instances.push(InstanceReport {
            instance: path.clone(),
            valid,
            errors,
        });
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        if !valid && args.fail_fast {
            warn!(instance = %path.display(), "Stopping at first invalid instance");
            break;
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    output.validation_report(&report)?;

    let failed = report.failed();
    if failed > 0 {
        return Err(Error::ValidationFailed {
            failed,
            total: args.instances.len(),
        });
    }
    info!("All instances are valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn sink() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(std::io::sink()))
    }

    fn fixture() -> (TempDir, PathBuf, PathBuf, PathBuf) {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("person.schema.yaml");
        fs::write(
            &schema,
            "type: object\nrequired: [email]\nproperties:\n  email:\n    type: string\n    format: email\n",
        )
        .unwrap();
        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"email": "ada@example.com"}"#).unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"email": "not-an-email"}"#).unwrap();
        (dir, schema, good, bad)
    }

    fn args(schema: PathBuf, instances: Vec<PathBuf>) -> ValidateArgs {
        ValidateArgs {
            schema,
            instances,
            no_formats: false,
            fail_fast: false,
        }
    }

    #[test]
    fn test_valid_instances() {
        let (_dir, schema, good, _) = fixture();
        let result = handle_validate(args(schema, vec![good]), &Config::default(), &mut sink());
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_instance_fails() {
        let (_dir, schema, good, bad) = fixture();
        let err = handle_validate(args(schema, vec![good, bad]), &Config::default(), &mut sink())
            .unwrap_err();
        assert!(matches!(err, Error::ValidationFailed { failed: 1, total: 2 }));
    }

    #[test]
    fn test_no_formats_flag() {
        let (_dir, schema, _, bad) = fixture();
        let mut validate_args = args(schema, vec![bad]);
        validate_args.no_formats = true;
        assert!(handle_validate(validate_args, &Config::default(), &mut sink()).is_ok());
    }

    #[test]
    fn test_missing_instance() {
        let (dir, schema, _, _) = fixture();
        let missing = dir.path().join("missing.json");
        let err = handle_validate(args(schema, vec![missing]), &Config::default(), &mut sink())
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
