//! Console rendering of tables

use std::io::Write;

use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::Result;
use crate::model::Table;

/// Terminal output with an optional coloured title line
pub struct TerminalOutput {
    color_choice: ColorChoice,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self {
            color_choice: ColorChoice::Auto,
        }
    }

    pub fn with_color_choice(color_choice: ColorChoice) -> Self {
        Self { color_choice }
    }

    /// Render to stdout
    pub fn print(&self, table: &Table, title: Option<&str>) -> Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        self.render(table, title, &mut stdout)
    }

    /// Render a titled grid followed by a row/column count line
    pub fn render(&self, table: &Table, title: Option<&str>, writer: &mut dyn WriteColor) -> Result<()> {
        if let Some(title) = title {
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            writeln!(writer, "{}", title)?;
            writer.reset()?;
        }

        write!(writer, "{}", build_grid(&table.header(), &table.rows()))?;
        writeln!(
            writer,
            "[{} rows x {} columns]",
            table.row_count(),
            table.column_count()
        )?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a bordered grid: header line, then one line per row
pub fn build_grid(header: &[String], rows: &[Vec<String>]) -> String {
    if header.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(header.iter().cloned());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }

    let mut grid = builder.build();
    grid.with(Style::sharp());

    let mut output = grid.to_string();
    output.push('\n');
    output
}
