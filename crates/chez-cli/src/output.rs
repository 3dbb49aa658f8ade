//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialised
//! rendering of validation reports and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use chez_schema::{CompositionDetail, ValidationError};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Outcome of validating one instance file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceReport {
    pub instance: PathBuf,
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Outcome of validating a set of instances against one schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub schema: PathBuf,
    pub instances: Vec<InstanceReport>,
}

impl ValidationReport {
    pub fn new(schema: PathBuf) -> Self {
        Self {
            schema,
            instances: Vec::new(),
        }
    }

    /// Number of instances that failed
    pub fn failed(&self) -> usize {
        self.instances.iter().filter(|report| !report.valid).count()
    }

    pub fn total(&self) -> usize {
        self.instances.len()
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a full validation report
    fn format_validation_report(&self, report: &ValidationReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Pretty JSON doubles as the human rendering of arbitrary data
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_validation_report(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_report_human(report)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Turn progress indicators off regardless of the terminal
    pub fn disable_progress(&mut self) {
        self.show_progress = false;
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Human {
            self.writeln(&formatted)
        } else {
            self.write(&formatted)
        }
    }

    /// Write a validation report with specialized formatting
    pub fn validation_report(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_validation_report(report)?;
        if self.format == OutputFormat::Human {
            if self.quiet {
                return Ok(());
            }
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Format a validation report for human reading
fn format_validation_report_human(report: &ValidationReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Schema: {}\n", report.schema.display()));
    for instance in &report.instances {
        if instance.valid {
            output.push_str(&format!("✅ {} is valid\n", instance.instance.display()));
            continue;
        }
        output.push_str(&format!(
            "❌ {} - {} error(s)\n",
            instance.instance.display(),
            instance.errors.len()
        ));
        for (i, error) in instance.errors.iter().enumerate() {
            output.push_str(&format!("{}. {}", i + 1, format_validation_error_human(error, 0)));
        }
    }

    let failed = report.failed();
    output.push_str(&format!(
        "\n{} valid, {} invalid\n",
        report.total() - failed,
        failed
    ));
    output
}

/// Format a single validation error for human reading
///
/// Branch errors of failed compositions are nested one level deeper.
fn format_validation_error_human(error: &ValidationError, depth: usize) -> String {
    let indent = "   ".repeat(depth);
    let mut output = String::new();

    output.push_str(&format!("{}📍 Path: {}\n", indent, error.path()));
    output.push_str(&format!("{}   💬 {}\n", indent, error));

    if let ValidationError::CompositionViolation {
        detail: CompositionDetail::NoneMatched { branch_errors },
        ..
    } = error
    {
        for (index, errors) in branch_errors.iter().enumerate() {
            output.push_str(&format!("{}   • Branch {}:\n", indent, index));
            for nested in errors {
                output.push_str(&format_validation_error_human(nested, depth + 2));
            }
        }
    }

    output
}
