//! tabkit - typed in-memory tables from delimited text
//!
//! Loads delimited text into a columnar store with per-column type
//! inference, and supports aggregation, mask filtering, missing-value
//! handling, renaming and writing back to text.

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;

pub use config::{LoadOptions, SaveOptions};
pub use error::{Result, TableError};
pub use model::{Cell, Column, ColumnType, CompareOp, Mask, Scalar, Table};
