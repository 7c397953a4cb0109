//! Data model: typed columns and the tables that own them

mod column;
mod mask;
mod schema;
mod table;
mod value;

pub use column::{Column, ColumnSummary};
pub use mask::Mask;
pub use schema::ColumnType;
pub use table::Table;
pub use value::{Cell, CompareOp, Scalar};
