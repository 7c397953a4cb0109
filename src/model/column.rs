//! Column store: one named, typed sequence of cells

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{Result, TableError};

use super::mask::Mask;
use super::schema::ColumnType;
use super::value::{Cell, CompareOp, Scalar};

/// A named column whose type is fixed when the column is built
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    values: Vec<Cell>,
}

/// Per-column statistics, as reported by `describe`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub count: usize,
    pub missing: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Column {
    /// Build a column from raw fields (`None` = missing), inferring its type
    pub fn from_fields(name: impl Into<String>, fields: Vec<Option<String>>) -> Self {
        let column_type = ColumnType::infer(fields.iter().flatten().map(String::as_str));
        let values = fields
            .into_iter()
            .map(|field| match field {
                Some(f) => Cell::parse(&f, column_type),
                None => Cell::Missing,
            })
            .collect();

        Self {
            name: name.into(),
            column_type,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.values.get(index)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|c| c.is_missing()).count()
    }

    pub fn present_count(&self) -> usize {
        self.len() - self.missing_count()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Copy of this column holding only the rows at `indices`, in that order
    pub(crate) fn take(&self, indices: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            column_type: self.column_type,
            values: indices
                .iter()
                .filter_map(|&i| self.values.get(i).cloned())
                .collect(),
        }
    }

    fn ensure_numeric(&self) -> Result<()> {
        if self.column_type.is_numeric() {
            Ok(())
        } else {
            Err(TableError::Type {
                column: self.name.clone(),
                column_type: self.column_type,
            })
        }
    }

    /// Arithmetic mean over present cells.
    ///
    /// A column without present cells yields `NaN`.
    pub fn mean(&self) -> Result<f64> {
        self.ensure_numeric()?;

        let (sum, count) = self
            .values
            .iter()
            .filter_map(Cell::as_f64)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

        Ok(sum / count as f64)
    }

    /// Values sorted ascending by numeric value. The sort is stable; missing
    /// cells are placed after all present cells.
    pub fn sorted_values(&self) -> Result<Vec<Cell>> {
        self.ensure_numeric()?;

        let (mut sorted, missing): (Vec<Cell>, Vec<Cell>) =
            self.values.iter().cloned().partition(|c| !c.is_missing());
        sorted.sort_by(numeric_order);
        sorted.extend(missing);
        Ok(sorted)
    }

    /// Smallest present value
    pub fn min(&self) -> Result<Option<f64>> {
        let sorted = self.sorted_values()?;
        Ok(sorted.first().and_then(Cell::as_f64))
    }

    /// Largest present value
    pub fn max(&self) -> Result<Option<f64>> {
        let sorted = self.sorted_values()?;
        Ok(sorted.iter().rev().find_map(Cell::as_f64))
    }

    /// Convert a replacement to a cell of this column's type
    pub(crate) fn coerce(&self, replacement: &Scalar) -> Result<Cell> {
        replacement
            .coerce(self.column_type)
            .ok_or_else(|| TableError::Coercion {
                column: self.name.clone(),
                column_type: self.column_type,
                value: replacement.to_string(),
            })
    }

    /// Replace every missing cell with `replacement`, coerced to the column
    /// type. Returns the number of cells filled.
    pub fn fill_missing(&mut self, replacement: impl Into<Scalar>) -> Result<usize> {
        let missing = self.missing_count();
        if missing == 0 {
            return Ok(0);
        }

        let cell = self.coerce(&replacement.into())?;
        self.fill_with(&cell);
        tracing::debug!(column = %self.name, filled = missing, "filled missing cells");
        Ok(missing)
    }

    pub(crate) fn fill_with(&mut self, cell: &Cell) {
        for value in self.values.iter_mut().filter(|v| v.is_missing()) {
            *value = cell.clone();
        }
    }

    /// Build a mask by comparing every cell to `key`. Cells that cannot be
    /// compared (missing, unparseable) never match.
    pub fn compare(&self, op: CompareOp, key: impl Into<Scalar>) -> Mask {
        let key = key.into();
        self.values
            .iter()
            .map(|cell| cell.compare(&key).is_some_and(|ord| op.matches(ord)))
            .collect()
    }

    pub fn eq(&self, key: impl Into<Scalar>) -> Mask {
        self.compare(CompareOp::Eq, key)
    }

    pub fn ne(&self, key: impl Into<Scalar>) -> Mask {
        self.compare(CompareOp::Ne, key)
    }

    pub fn lt(&self, key: impl Into<Scalar>) -> Mask {
        self.compare(CompareOp::Lt, key)
    }

    pub fn gt(&self, key: impl Into<Scalar>) -> Mask {
        self.compare(CompareOp::Gt, key)
    }

    pub fn le(&self, key: impl Into<Scalar>) -> Mask {
        self.compare(CompareOp::Le, key)
    }

    pub fn ge(&self, key: impl Into<Scalar>) -> Mask {
        self.compare(CompareOp::Ge, key)
    }

    /// Counts plus mean/min/max for numeric columns with present values
    pub fn summary(&self) -> ColumnSummary {
        let missing = self.missing_count();
        let count = self.len() - missing;
        let numeric = self.column_type.is_numeric() && count > 0;

        ColumnSummary {
            name: self.name.clone(),
            column_type: self.column_type,
            count,
            missing,
            mean: numeric.then(|| self.mean().ok()).flatten(),
            min: numeric.then(|| self.min().ok().flatten()).flatten(),
            max: numeric.then(|| self.max().ok().flatten()).flatten(),
        }
    }
}

/// Ascending numeric order. Equal values (`-0.0` and `0.0` included) tie so
/// the stable sort keeps their input order; NaN sorts last.
fn numeric_order(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Integer { value: x, .. }, Cell::Integer { value: y, .. }) => x.cmp(y),
        _ => {
            let x = a.as_f64().unwrap_or(f64::NAN);
            let y = b.as_f64().unwrap_or(f64::NAN);
            match (x.is_nan(), y.is_nan()) {
                (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
            }
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "-".repeat(self.name.chars().count()))?;
        for value in &self.values {
            writeln!(f, "{}", value)?;
        }
        Ok(())
    }
}
