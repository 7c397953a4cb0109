//! Cell storage and scalar comparison keys

use std::borrow::Cow;
use std::cmp::Ordering;

use serde::Serialize;

use super::schema::ColumnType;

/// A stored cell, parsed once at load time according to its column's type.
///
/// Numeric cells keep the text they were read from, so rendering and saving
/// reproduce the source while arithmetic and comparison use the parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Integer { value: i64, text: String },
    Float { value: f64, text: String },
    Text(String),
}

impl Cell {
    /// Integer cell rendered in canonical form
    pub fn integer(value: i64) -> Cell {
        Cell::Integer {
            value,
            text: value.to_string(),
        }
    }

    /// Float cell rendered in canonical form
    pub fn float(value: f64) -> Cell {
        Cell::Float {
            value,
            text: value.to_string(),
        }
    }

    pub fn text(text: impl Into<String>) -> Cell {
        Cell::Text(text.into())
    }

    /// Build a cell from a present field of a column with the given type
    pub fn parse(field: &str, column_type: ColumnType) -> Cell {
        let text = field.to_string();
        match column_type {
            ColumnType::Integer => match field.parse::<i64>() {
                Ok(value) => Cell::Integer { value, text },
                Err(_) => Cell::Text(text),
            },
            ColumnType::Float => match field.parse::<f64>() {
                Ok(value) => Cell::Float { value, text },
                Err(_) => Cell::Text(text),
            },
            ColumnType::Text => Cell::Text(text),
        }
    }

    /// Check if the cell is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value of the cell, if it holds one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer { value, .. } => Some(*value as f64),
            Cell::Float { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Cell text as it was read or filled; missing cells render empty
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Cell::Missing => Cow::Borrowed(""),
            Cell::Integer { text, .. } | Cell::Float { text, .. } | Cell::Text(text) => {
                Cow::Borrowed(text.as_str())
            }
        }
    }

    /// Order the cell against a key. `None` means the pair is not comparable
    /// (missing cell, unparseable text against a numeric key, or NaN).
    pub fn compare(&self, key: &Scalar) -> Option<Ordering> {
        match (self, key) {
            (Cell::Missing, _) => None,
            (Cell::Integer { value, .. }, Scalar::Integer(k)) => Some(value.cmp(k)),
            (cell, Scalar::Integer(_) | Scalar::Float(_)) => {
                let k = key.as_f64()?;
                let v = match cell {
                    Cell::Text(s) => s.parse::<f64>().ok()?,
                    other => other.as_f64()?,
                };
                v.partial_cmp(&k)
            }
            (cell, Scalar::Text(k)) => Some(cell.display().as_ref().cmp(k.as_str())),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A single value used as a comparison key or a fill replacement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Read a literal the way a column would classify it
    pub fn infer(literal: &str) -> Scalar {
        if let Ok(i) = literal.parse::<i64>() {
            Scalar::Integer(i)
        } else if let Ok(f) = literal.parse::<f64>() {
            Scalar::Float(f)
        } else {
            Scalar::Text(literal.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(_) => None,
        }
    }

    /// Convert to a cell of the given column type, if the value allows it.
    /// Text that parses as the column's type is kept verbatim; float-to-integer
    /// conversion truncates toward zero.
    pub fn coerce(&self, column_type: ColumnType) -> Option<Cell> {
        match column_type {
            ColumnType::Integer => match self {
                Scalar::Integer(i) => Some(Cell::integer(*i)),
                Scalar::Float(f) => truncate(*f).map(Cell::integer),
                Scalar::Text(s) => match s.parse::<i64>() {
                    Ok(value) => Some(Cell::Integer {
                        value,
                        text: s.clone(),
                    }),
                    Err(_) => s.parse::<f64>().ok().and_then(truncate).map(Cell::integer),
                },
            },
            ColumnType::Float => match self {
                Scalar::Integer(i) => Some(Cell::Float {
                    value: *i as f64,
                    text: i.to_string(),
                }),
                Scalar::Float(f) => Some(Cell::float(*f)),
                Scalar::Text(s) => s.parse::<f64>().ok().map(|value| Cell::Float {
                    value,
                    text: s.clone(),
                }),
            },
            ColumnType::Text => Some(Cell::Text(self.to_string())),
        }
    }
}

fn truncate(f: f64) -> Option<i64> {
    if f.is_finite() {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

/// Comparison operator applied cell-by-cell to build a mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompareOp {
    /// Whether an ordering satisfies the operator
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }
}

impl std::str::FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "=" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Ne),
            "<" => Ok(CompareOp::Lt),
            ">" => Ok(CompareOp::Gt),
            "<=" => Ok(CompareOp::Le),
            ">=" => Ok(CompareOp::Ge),
            _ => Err(format!("Unknown comparison operator: {}", s)),
        }
    }
}
