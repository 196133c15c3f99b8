//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use courier_domain::{Record, RecordCollection};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format stored records, as JSON or as a table.
    pub fn format_records(&self, records: &RecordCollection, json: bool) -> Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(records)?);
        }
        if records.is_empty() {
            return Ok(self.colorize("No records stored.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Created", "Origin", "Fields"]);
        for record in records {
            builder.push_record([
                record.id.to_string(),
                record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                record.origin_address.to_string(),
                format_fields(record),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format the result of a capture.
    pub fn record_captured(&self, record: &Record) -> String {
        self.success(&format!("Record captured: {}", record.id))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn format_fields(record: &Record) -> String {
    record
        .fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}
