//! JSON output for column summaries

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::model::{ColumnSummary, Table};

/// JSON summary formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Write one summary object per column, with the table's row count
    pub fn render_summary(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let output = JsonSummary {
            rows: table.row_count(),
            columns: table.describe(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::from)?;
        } else {
            serde_json::to_writer(&mut *writer, &output).map_err(std::io::Error::from)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonSummary {
    rows: usize,
    columns: Vec<ColumnSummary>,
}
