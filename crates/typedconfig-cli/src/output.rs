//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for synthesized types and validation errors.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, trace};
use typedconfig_core::{FieldType, RecordType, SchemaWarning, Synthesis, ValidationError, ValidationErrors};

/// Serializable summary of a synthesis
#[derive(Debug, Serialize)]
pub struct TypeReport<'a> {
    pub config_type: Value,
    pub warnings: &'a [SchemaWarning],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_order: Option<Vec<Vec<String>>>,
}

impl<'a> TypeReport<'a> {
    pub fn new(synthesis: &'a Synthesis, with_order: bool) -> Self {
        let resolution_order = with_order.then(|| {
            synthesis
                .resolution_order
                .iter()
                .map(|round| round.iter().map(ToString::to_string).collect())
                .collect()
        });
        Self {
            config_type: synthesis.config_type.schema(),
            warnings: &synthesis.warnings,
            resolution_order,
        }
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format validation errors, one entry per failed field or rule
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => format_validation_errors_human(errors),
            _ => self.format(errors),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
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

    fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || !self.is_human() {
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
        if self.quiet || !self.is_human() {
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
        if !self.is_human() {
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
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.is_human() || self.format == OutputFormat::Json {
            self.writeln(&formatted)
        } else {
            self.write(&formatted)
        }
    }

    /// Write validation errors with specialized formatting
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        let formatted = self.format.format_validation_errors(errors)?;
        self.writeln(formatted.trim_end())
    }

    /// Describe a synthesized type
    ///
    /// Machine formats get the full report; the human format gets one
    /// table per record, nested records after their parent.
    pub fn type_report(&mut self, report: &TypeReport<'_>, config_type: &RecordType) -> Result<()> {
        if !self.is_human() {
            return self.data(report);
        }

        let mut pending = vec![(String::new(), config_type.clone())];
        while let Some((path, record)) = pending.pop() {
            let title = if path.is_empty() {
                record.name().to_string()
            } else {
                format!("{} ({})", path, record.name())
            };
            self.section(&title)?;
            self.table(&["Field", "Type", "Default", "Validators"], record_rows(&record))?;

            let record_validators: Vec<&str> = record.root_validators().map(|b| b.name.as_str()).collect();
            if !record_validators.is_empty() {
                self.writeln(&format!("Record validators: {}", record_validators.join(", ")))?;
            }

            // reversed so nested records come out in field order
            for field in record.fields().iter().rev() {
                if let FieldType::Record(nested) = &field.ty {
                    let nested_path = if path.is_empty() {
                        field.name.clone()
                    } else {
                        format!("{}.{}", path, field.name)
                    };
                    pending.push((nested_path, nested.clone()));
                }
            }
        }

        if let Some(order) = &report.resolution_order {
            self.section("Resolution Order")?;
            for (round, paths) in order.iter().enumerate() {
                self.writeln(&format!("{}. {}", round + 1, paths.join(", ")))?;
            }
        }

        Ok(())
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

fn record_rows(record: &RecordType) -> Vec<Vec<String>> {
    record
        .fields()
        .iter()
        .map(|field| {
            let default = match &field.default {
                Some(value) => format_value_compact(value),
                None => "(required)".to_string(),
            };
            let validators = record
                .field_validators(&field.name)
                .map(|binding| binding.name.clone())
                .collect::<Vec<_>>()
                .join(", ");
            vec![field.name.clone(), field.ty.describe(), default, validators]
        })
        .collect()
}

/// Format validation errors for human reading
fn format_validation_errors_human(errors: &ValidationErrors) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("❌ Validation Failed - {} Error(s)\n\n", errors.len()));

    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("{}. {}", i + 1, format_validation_error_human(error)));
    }

    Ok(output)
}

/// Format a single validation error for human reading
fn format_validation_error_human(error: &ValidationError) -> String {
    let mut output = format!("📍 Path: {}\n", error.path);
    output.push_str(&format!("   💬 Message: {}\n", error.message));
    if let Some(rule) = &error.rule {
        output.push_str(&format!("   🏷️  Rule: {}\n", rule));
    }
    output
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            if arr.len() <= 3 {
                format!(
                    "[{}]",
                    arr.iter().map(format_value_compact).collect::<Vec<_>>().join(", ")
                )
            } else {
                format!("[{} items]", arr.len())
            }
        }
        Value::Object(obj) => {
            if obj.len() <= 2 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    include!("output/tests.rs");
}
