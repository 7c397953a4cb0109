//! Record sources feeding table construction

mod delimited;

pub use self::delimited::DelimitedSource;

/// One input line split into fields, in header order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Physical line number, starting at 1
    pub line: u64,
    pub fields: Vec<String>,
}

impl Record {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// An empty input line: a single empty field
    pub fn is_blank(&self) -> bool {
        matches!(self.fields.as_slice(), [field] if field.is_empty())
    }
}
