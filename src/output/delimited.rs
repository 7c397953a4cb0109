//! Delimited text writer used by `Table::save`

use std::io::Write;

use crate::config::SaveOptions;
use crate::error::{Result, TableError};
use crate::model::{Column, Table};

/// Columns to emit, in output order. Fails on an unknown column or a
/// non-ASCII delimiter.
pub(crate) fn resolve_columns<'a>(table: &'a Table, options: &SaveOptions) -> Result<Vec<&'a Column>> {
    if !options.delimiter.is_ascii() {
        return Err(TableError::Delimiter(options.delimiter));
    }
    match &options.columns {
        Some(names) => names.iter().map(|name| table.column(name)).collect(),
        None => Ok(table.columns().collect()),
    }
}

/// Write `table` to `writer`: optional header, optional leading row index,
/// one line per row with a trailing newline. Fields are never quoted.
pub fn write_table(table: &Table, writer: &mut dyn Write, options: &SaveOptions) -> Result<()> {
    let columns = resolve_columns(table, options)?;
    let separator = char::from(options.delimiter).to_string();

    if options.include_header {
        let mut fields: Vec<&str> = Vec::with_capacity(columns.len() + 1);
        if options.include_row_index {
            fields.push("");
        }
        fields.extend(columns.iter().map(|c| c.name()));
        writeln!(writer, "{}", fields.join(&separator))?;
    }

    for row in 0..table.row_count() {
        let mut fields: Vec<String> = Vec::with_capacity(columns.len() + 1);
        if options.include_row_index {
            fields.push(row.to_string());
        }
        for column in &columns {
            let field = match column.get(row) {
                Some(cell) if !cell.is_missing() => cell.display().into_owned(),
                _ => options.missing_placeholder.clone(),
            };
            fields.push(field);
        }
        writeln!(writer, "{}", fields.join(&separator))?;
    }

    Ok(())
}
