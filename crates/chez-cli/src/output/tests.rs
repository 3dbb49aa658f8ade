// Tests for output formatting
//
// These tests cover the human and machine renderings of validation
// reports and the OutputWriter message helpers.

use super::*;
use chez_schema::{CompositionKind, JsonType};
use std::sync::{Arc, Mutex};

/// A writer whose contents the test can read back
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_report() -> ValidationReport {
    ValidationReport {
        schema: PathBuf::from("person.schema.json"),
        instances: vec![
            InstanceReport {
                instance: PathBuf::from("ada.json"),
                valid: true,
                errors: vec![],
            },
            InstanceReport {
                instance: PathBuf::from("nobody.json"),
                valid: false,
                errors: vec![
                    ValidationError::MissingField {
                        path: "/".to_string(),
                        name: "name".to_string(),
                    },
                    ValidationError::TypeMismatch {
                        path: "/age".to_string(),
                        expected: JsonType::Integer,
                        actual: JsonType::String,
                    },
                ],
            },
        ],
    }
}

#[test]
fn test_validation_report_human() {
    let formatted = format_validation_report_human(&sample_report());

    assert!(formatted.contains("Schema: person.schema.json"));
    assert!(formatted.contains("✅ ada.json is valid"));
    assert!(formatted.contains("❌ nobody.json - 2 error(s)"));
    assert!(formatted.contains("📍 Path: /age"));
    assert!(formatted.contains("required field 'name' is missing"));
    assert!(formatted.contains("1 valid, 1 invalid"));
}

#[test]
fn test_validation_report_json() {
    let formatted = OutputFormat::Json
        .format_validation_report(&sample_report())
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();

    assert_eq!(value["instances"][1]["valid"], false);
    assert_eq!(value["instances"][1]["errors"][0]["error"], "missing_field");
    assert_eq!(value["instances"][1]["errors"][1]["path"], "/age");
}

#[test]
fn test_composition_branches_are_nested() {
    let error = ValidationError::CompositionViolation {
        path: "/shape".to_string(),
        kind: CompositionKind::AnyOf,
        detail: CompositionDetail::NoneMatched {
            branch_errors: vec![
                vec![ValidationError::MissingField {
                    path: "/shape".to_string(),
                    name: "radius".to_string(),
                }],
                vec![ValidationError::MissingField {
                    path: "/shape".to_string(),
                    name: "width".to_string(),
                }],
            ],
        },
    };

    let formatted = format_validation_error_human(&error, 0);
    assert!(formatted.contains("• Branch 0:"));
    assert!(formatted.contains("• Branch 1:"));
    assert!(formatted.contains("      📍 Path: /shape"));
    assert!(formatted.contains("'width'"));
}

#[test]
fn test_report_counts() {
    let report = sample_report();
    assert_eq!(report.total(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(ValidationReport::new(PathBuf::from("s.json")).failed(), 0);
}

#[test]
fn test_messages_respect_quiet_and_format() {
    let (mut human, buffer) = writer(OutputFormat::Human, false);
    human.info("checking").unwrap();
    human.success("done").unwrap();
    human.error("broken").unwrap();
    assert_eq!(buffer.contents(), "INFO: checking\ndone\nERROR: broken\n");

    let (mut quiet, buffer) = writer(OutputFormat::Human, true);
    quiet.info("checking").unwrap();
    quiet.success("done").unwrap();
    quiet.error("broken").unwrap();
    assert_eq!(buffer.contents(), "ERROR: broken\n");

    let (mut json, buffer) = writer(OutputFormat::Json, false);
    json.info("checking").unwrap();
    json.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_data_in_yaml() {
    let (mut yaml, buffer) = writer(OutputFormat::Yaml, false);
    yaml.data(&serde_json::json!({"type": "string"})).unwrap();
    assert_eq!(buffer.contents(), "type: string\n");
}

#[test]
fn test_output_writer_creation() {
    let mut writer = OutputWriter::new(OutputFormat::Yaml, true, false);
    writer.disable_progress();
    assert_eq!(writer.format(), OutputFormat::Yaml);
    assert!(writer.progress_bar(3, "Validating").is_none());
}
