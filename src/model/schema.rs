//! Column type tags and type inference

use serde::{Deserialize, Serialize};

/// Scalar kind of a column, decided once when the table is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    /// Classify a column from its present (non-missing) fields.
    ///
    /// Integer if every field parses fully as `i64`, else Float if every
    /// field parses fully as `f64`, else Text. No fields at all is Text.
    pub fn infer<'a, I>(fields: I) -> ColumnType
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut inferred: Option<ColumnType> = None;

        for field in fields {
            let cell_type = if field.parse::<i64>().is_ok() {
                ColumnType::Integer
            } else if field.parse::<f64>().is_ok() {
                ColumnType::Float
            } else {
                return ColumnType::Text;
            };

            inferred = Some(match inferred {
                Some(t) => t.widen(cell_type),
                None => cell_type,
            });
        }

        inferred.unwrap_or(ColumnType::Text)
    }

    /// Widen the type to accommodate another type
    pub fn widen(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                ColumnType::Float
            }
            _ => ColumnType::Text,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}
