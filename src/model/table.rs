//! Table: ordered, same-length columns plus whole-table transforms

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::config::{LoadOptions, SaveOptions};
use crate::error::{Result, TableError};
use crate::output::{delimited, terminal};
use crate::parser::{DelimitedSource, Record};

use super::column::{Column, ColumnSummary};
use super::mask::Mask;
use super::value::{Cell, Scalar};

/// A table of named columns in header order.
///
/// Column data is authoritative; the row-major view returned by
/// [`Table::rows`] is rebuilt from it on every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Column>,
    row_count: usize,
}

impl Table {
    /// Load a delimited file
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Table> {
        let source = DelimitedSource::open(path, options.delimiter)?;
        Self::from_records(source, options)
    }

    /// Load delimited text from any reader
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Table> {
        Self::from_records(DelimitedSource::from_reader(reader, options.delimiter)?, options)
    }

    /// Build a table from a header record followed by data records.
    ///
    /// A record one field short of the header gets a missing last cell; any
    /// other width mismatch is a format error naming the record's line. A
    /// blank record is a missing cell in a one-column table and is skipped
    /// otherwise.
    pub fn from_records<I>(records: I, options: &LoadOptions) -> Result<Table>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut records = records.into_iter();

        let header = match records.next() {
            Some(record) => record?.fields,
            None => return Err(TableError::format(1, "missing header record")),
        };
        let names: Vec<String> = header
            .into_iter()
            .map(|name| normalize(name, options))
            .collect();

        let mut seen = FxHashSet::default();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }

        let width = names.len();
        let mut fields: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
        let mut row_count = 0;

        for record in records {
            let record = record?;
            let line = record.line;

            if width > 1 && record.is_blank() {
                tracing::debug!(line, "skipped blank line");
                continue;
            }

            let mut record = record.fields;
            if record.len() + 1 == width {
                tracing::warn!(line, "record is one field short, last cell read as missing");
                record.push(String::new());
            } else if record.len() != width {
                return Err(TableError::format(
                    line,
                    format!("expected {} fields, found {}", width, record.len()),
                ));
            }

            for (column, field) in fields.iter_mut().zip(record) {
                let field = normalize(field, options);
                column.push((!options.is_missing(&field)).then_some(field));
            }
            row_count += 1;
        }

        let columns: IndexMap<String, Column> = names
            .into_iter()
            .zip(fields)
            .map(|(name, fields)| {
                let column = Column::from_fields(name.clone(), fields);
                (name, column)
            })
            .collect();

        tracing::debug!(
            rows = row_count,
            columns = columns.len(),
            "loaded table"
        );

        Ok(Table { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Column names in header order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| TableError::NotFound(name.to_string()))
    }

    /// Get exclusive access to a column by name
    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .get_mut(name)
            .ok_or_else(|| TableError::NotFound(name.to_string()))
    }

    /// Header line of the display view
    pub fn header(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    /// Cells of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.row_count {
            return None;
        }
        self.columns.values().map(|c| c.get(index)).collect()
    }

    /// Row-major text view of the whole table; missing cells are empty
    pub fn rows(&self) -> Vec<Vec<String>> {
        (0..self.row_count)
            .map(|i| {
                self.columns
                    .values()
                    .map(|c| c.get(i).map(|cell| cell.to_string()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    /// Rename columns, applying `(old, new)` pairs in order so a later pair
    /// may refer to a name introduced by an earlier one. All pairs are
    /// checked first; on error the table is unchanged.
    pub fn rename<O, N>(&mut self, pairs: &[(O, N)]) -> Result<()>
    where
        O: AsRef<str>,
        N: AsRef<str>,
    {
        let mut names = self.header();

        for (old, new) in pairs {
            let (old, new) = (old.as_ref(), new.as_ref());
            let position = names
                .iter()
                .position(|n| n == old)
                .ok_or_else(|| TableError::NotFound(old.to_string()))?;
            if old != new && names.iter().any(|n| n == new) {
                return Err(TableError::DuplicateColumn(new.to_string()));
            }
            names[position] = new.to_string();
        }

        let columns = std::mem::take(&mut self.columns);
        self.columns = names
            .into_iter()
            .zip(columns.into_values())
            .map(|(name, mut column)| {
                column.set_name(name.clone());
                (name, column)
            })
            .collect();

        tracing::debug!(pairs = pairs.len(), "renamed columns");
        Ok(())
    }

    /// Fill missing cells in every column with `replacement`, coerced per
    /// column. Fails without changing anything if any column rejects it.
    pub fn fill_missing(&mut self, replacement: impl Into<Scalar>) -> Result<usize> {
        let replacement = replacement.into();

        let fills = self
            .columns
            .values()
            .map(|column| {
                if column.missing_count() == 0 {
                    Ok(None)
                } else {
                    column.coerce(&replacement).map(Some)
                }
            })
            .collect::<Result<Vec<Option<Cell>>>>()?;

        let mut filled = 0;
        for (column, cell) in self.columns.values_mut().zip(fills) {
            if let Some(cell) = cell {
                filled += column.missing_count();
                column.fill_with(&cell);
            }
        }

        tracing::debug!(filled, replacement = %replacement, "filled missing cells");
        Ok(filled)
    }

    /// Remove every row whose cell in `name` is missing, from all columns.
    /// Returns the number of rows removed.
    pub fn drop_missing(&mut self, name: &str) -> Result<usize> {
        let keep: Vec<usize> = self
            .column(name)?
            .values()
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_missing())
            .map(|(i, _)| i)
            .collect();

        let dropped = self.row_count - keep.len();
        if dropped > 0 {
            *self = self.take(&keep);
        }

        tracing::debug!(column = name, dropped, "dropped rows with missing cells");
        Ok(dropped)
    }

    /// New table holding the rows where `mask` is true
    pub fn filter(&self, mask: &Mask) -> Result<Table> {
        if mask.len() != self.row_count {
            return Err(TableError::Shape {
                mask_len: mask.len(),
                row_count: self.row_count,
            });
        }

        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, keep)| *keep)
            .map(|(i, _)| i)
            .collect();

        tracing::debug!(
            from = self.row_count,
            to = indices.len(),
            "filtered table"
        );
        Ok(self.take(&indices))
    }

    /// New table restricted to the named columns, in the given order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let mut columns = IndexMap::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let column = self.column(name)?;
            if columns.insert(name.to_string(), column.clone()).is_some() {
                return Err(TableError::DuplicateColumn(name.to_string()));
            }
        }

        Ok(Table {
            columns,
            row_count: self.row_count,
        })
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        let end = n.min(self.row_count);
        self.take(&(0..end).collect::<Vec<_>>())
    }

    /// Last `n` rows
    pub fn tail(&self, n: usize) -> Table {
        let start = self.row_count.saturating_sub(n);
        self.take(&(start..self.row_count).collect::<Vec<_>>())
    }

    /// Statistics for every column
    pub fn describe(&self) -> Vec<ColumnSummary> {
        self.columns.values().map(Column::summary).collect()
    }

    /// Write the table as delimited text to a file, creating parent
    /// directories as needed
    pub fn save(&self, path: &Path, options: &SaveOptions) -> Result<()> {
        // Resolve the selection before touching the filesystem
        delimited::resolve_columns(self, options)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, options)?;
        writer.flush()?;

        tracing::debug!(path = %path.display(), rows = self.row_count, "saved table");
        Ok(())
    }

    /// Write the table as delimited text to any byte sink
    pub fn write_to(&self, writer: &mut dyn Write, options: &SaveOptions) -> Result<()> {
        delimited::write_table(self, writer, options)
    }

    fn take(&self, indices: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|(name, column)| (name.clone(), column.take(indices)))
                .collect(),
            row_count: indices.len(),
        }
    }
}

fn normalize(field: String, options: &LoadOptions) -> String {
    if options.trim {
        field.trim().to_string()
    } else {
        field
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", terminal::build_grid(&self.header(), &self.rows()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    const PEOPLE: &str = "name,age,salary\nAlice,30,5000.5\nBob,,4000\nCara,25,\n";

    fn people() -> Table {
        Table::from_reader(PEOPLE.as_bytes(), &LoadOptions::default()).unwrap()
    }

    fn records(lines: &[&[&str]]) -> Vec<Result<Record>> {
        lines
            .iter()
            .zip(1..)
            .map(|(r, line)| Ok(Record::new(line, r.iter().map(|s| s.to_string()).collect())))
            .collect()
    }

    #[test]
    fn test_load_infers_types() {
        let table = people();
        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["name", "age", "salary"]
        );
        assert_eq!(table.column("name").unwrap().column_type(), ColumnType::Text);
        assert_eq!(table.column("age").unwrap().column_type(), ColumnType::Integer);
        assert_eq!(table.column("salary").unwrap().column_type(), ColumnType::Float);
        assert_eq!(table.column("age").unwrap().get(1), Some(&Cell::Missing));
    }

    #[test]
    fn test_load_pads_one_short_record() {
        let table =
            Table::from_reader("a,b\n1,2\n3\n".as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("b").unwrap().get(1), Some(&Cell::Missing));
        assert_eq!(table.column("a").unwrap().get(1), Some(&Cell::integer(3)));
    }

    #[test]
    fn test_load_single_column_keeps_blank_lines_as_missing() {
        let table = Table::from_reader("a\n1\n\n3\n".as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(table.row_count(), 3);
        let a = table.column("a").unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.column_type(), ColumnType::Integer);
        assert_eq!(a.get(1), Some(&Cell::Missing));
        assert_eq!(a.get(2), Some(&Cell::integer(3)));

        let trailing = Table::from_reader("a\n1\n\n".as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(trailing.row_count(), 2);
        assert!(trailing.column("a").unwrap().get(1).unwrap().is_missing());
    }

    #[test]
    fn test_load_skips_blank_lines_in_wider_tables() {
        let table =
            Table::from_reader("a,b\n1,2\n\n3,4\n\n".as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows(), vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_format_error_names_physical_line() {
        let err = Table::from_reader("a,b,c\n1,2,3\n\n\n4\n".as_bytes(), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, TableError::Format { line: 5, .. }));
    }

    #[test]
    fn test_load_rejects_non_ascii_delimiter() {
        let opts = LoadOptions::default().with_delimiter(0xE9);
        let err = Table::from_reader("a".as_bytes(), &opts).unwrap_err();
        assert!(matches!(err, TableError::Delimiter(0xE9)));
    }

    #[test]
    fn test_load_keeps_numeric_text() {
        let table =
            Table::from_reader("x,y\n1.0,3.10\n2.0,007\n".as_bytes(), &LoadOptions::default())
                .unwrap();
        assert_eq!(table.column("x").unwrap().column_type(), ColumnType::Float);
        assert_eq!(table.column("y").unwrap().column_type(), ColumnType::Float);
        assert_eq!(table.rows(), vec![vec!["1.0", "3.10"], vec!["2.0", "007"]]);
        let mean = table.column("y").unwrap().mean().unwrap();
        assert!((mean - 5.05).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_wide_and_very_short_records() {
        let wide = Table::from_records(
            records(&[&["a", "b"], &["1", "2", "3"]]),
            &LoadOptions::default(),
        );
        assert!(matches!(wide, Err(TableError::Format { line: 2, .. })));

        let short = Table::from_records(
            records(&[&["a", "b", "c"], &["1", "2", "3"], &["1"]]),
            &LoadOptions::default(),
        );
        assert!(matches!(short, Err(TableError::Format { line: 3, .. })));
    }

    #[test]
    fn test_load_rejects_empty_source_and_duplicate_header() {
        let empty = Table::from_records(Vec::<Result<Record>>::new(), &LoadOptions::default());
        assert!(matches!(empty, Err(TableError::Format { line: 1, .. })));

        let dup = Table::from_records(records(&[&["a", "a"]]), &LoadOptions::default());
        assert!(matches!(dup, Err(TableError::DuplicateColumn(name)) if name == "a"));
    }

    #[test]
    fn test_load_options() {
        let opts = LoadOptions::default()
            .with_delimiter(b';')
            .with_trim(true)
            .with_null_values(vec!["NA".into()]);
        let table = Table::from_reader(" x ; y\n 1 ;NA\n2; 3\n".as_bytes(), &opts).unwrap();
        assert_eq!(table.header(), vec!["x", "y"]);
        assert_eq!(table.column("x").unwrap().column_type(), ColumnType::Integer);
        assert_eq!(table.column("y").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_header_only_table() {
        let table = Table::from_reader("a,b\n".as_bytes(), &LoadOptions::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("a").unwrap().column_type(), ColumnType::Text);
    }

    #[test]
    fn test_mean_then_fill() {
        let data = "name,age\nAlice,30\nBob,\nCara,25";
        let mut table = Table::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(table.column("age").unwrap().mean().unwrap(), 27.5);

        table.column_mut("age").unwrap().fill_missing(0).unwrap();
        let mean = table.column("age").unwrap().mean().unwrap();
        assert!((mean - 55.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_column_not_found() {
        let mut table = people();
        assert!(matches!(table.column("nope"), Err(TableError::NotFound(_))));
        assert!(matches!(table.column_mut("nope"), Err(TableError::NotFound(_))));
    }

    #[test]
    fn test_rename_preserves_order_and_data() {
        let mut table = people();
        table
            .rename(&[("age", "years"), ("salary", "income")])
            .unwrap();
        assert_eq!(table.header(), vec!["name", "years", "income"]);
        let years = table.column("years").unwrap();
        assert_eq!(years.name(), "years");
        assert_eq!(years.column_type(), ColumnType::Integer);
        assert_eq!(years.get(0), Some(&Cell::integer(30)));
        assert!(table.column("age").is_err());
    }

    #[test]
    fn test_rename_is_sequential() {
        let mut table = people();
        table.rename(&[("age", "a"), ("a", "b")]).unwrap();
        assert_eq!(table.header(), vec!["name", "b", "salary"]);

        // swap through a temporary name
        table
            .rename(&[("name", "tmp"), ("b", "name"), ("tmp", "b")])
            .unwrap();
        assert_eq!(table.header(), vec!["b", "name", "salary"]);
        assert_eq!(table.column("name").unwrap().column_type(), ColumnType::Integer);
    }

    #[test]
    fn test_rename_missing_leaves_table_unchanged() {
        let mut table = people();
        let before = table.clone();
        let err = table.rename(&[("age", "years"), ("nope", "x")]).unwrap_err();
        assert!(matches!(err, TableError::NotFound(name) if name == "nope"));
        assert_eq!(table, before);

        let err = table.rename(&[("age", "name")]).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn(_)));
        assert_eq!(table, before);
    }

    #[test]
    fn test_fill_missing_table_wide() {
        let mut table = people();
        assert_eq!(table.fill_missing(5).unwrap(), 2);
        assert_eq!(table.column("age").unwrap().get(1), Some(&Cell::integer(5)));
        assert_eq!(table.column("salary").unwrap().get(2).unwrap().as_f64(), Some(5.0));
        assert!(table.columns().all(|c| c.missing_count() == 0));
    }

    #[test]
    fn test_fill_missing_table_wide_is_atomic() {
        let mut table = people();
        let before = table.clone();
        assert!(matches!(
            table.fill_missing("n/a"),
            Err(TableError::Coercion { .. })
        ));
        assert_eq!(table, before);
    }

    #[test]
    fn test_drop_missing_removes_rows_everywhere() {
        let mut table = people();
        assert_eq!(table.drop_missing("age").unwrap(), 1);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows(),
            vec![vec!["Alice", "30", "5000.5"], vec!["Cara", "25", ""]]
        );
        assert!(table.columns().all(|c| c.len() == 2));
        assert!(matches!(
            table.drop_missing("nope"),
            Err(TableError::NotFound(_))
        ));
    }

    #[test]
    fn test_filter_keeps_selected_rows() {
        let table = people();
        let filtered = table.filter(&Mask::from(vec![true, false, true])).unwrap();
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(
            filtered.rows(),
            vec![vec!["Alice", "30", "5000.5"], vec!["Cara", "25", ""]]
        );
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_filter_by_comparison() {
        let table = people();
        let mask = table.column("age").unwrap().gt(26);
        let older = table.filter(&mask).unwrap();
        assert_eq!(older.rows(), vec![vec!["Alice", "30", "5000.5"]]);
    }

    #[test]
    fn test_filter_result_is_independent() {
        let table = people();
        let mut filtered = table.filter(&Mask::from(vec![false, true, true])).unwrap();
        filtered.fill_missing(1).unwrap();
        assert_eq!(table.column("age").unwrap().missing_count(), 1);
        assert_eq!(filtered.column("age").unwrap().missing_count(), 0);
    }

    #[test]
    fn test_filter_shape_mismatch() {
        let table = people();
        let err = table.filter(&Mask::from(vec![true])).unwrap_err();
        assert!(matches!(
            err,
            TableError::Shape {
                mask_len: 1,
                row_count: 3
            }
        ));
    }

    #[test]
    fn test_select() {
        let table = people();
        let view = table.select(&["salary", "name"]).unwrap();
        assert_eq!(view.header(), vec!["salary", "name"]);
        assert_eq!(view.rows()[0], vec!["5000.5", "Alice"]);
        assert!(matches!(
            table.select(&["name", "nope"]),
            Err(TableError::NotFound(_))
        ));
    }

    #[test]
    fn test_head_and_tail() {
        let table = people();
        assert_eq!(table.head(2).rows().len(), 2);
        assert_eq!(table.head(10).row_count(), 3);
        let tail = table.tail(1);
        assert_eq!(tail.rows(), vec![vec!["Cara", "25", ""]]);
        assert_eq!(table.tail(0).row_count(), 0);
    }

    #[test]
    fn test_row_access() {
        let table = people();
        let row = table.row(1).unwrap();
        assert_eq!(row[0], &Cell::Text("Bob".into()));
        assert!(row[1].is_missing());
        assert!(table.row(3).is_none());
    }

    #[test]
    fn test_display_renders_grid() {
        let rendered = people().to_string();
        assert!(rendered.contains("name"));
        assert!(rendered.contains("Alice"));
        assert!(rendered.contains("5000.5"));
    }
}
