//! Load and save options

/// Options controlling how delimited text is read into a table
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter, a single ASCII byte
    pub delimiter: u8,
    /// Strip leading/trailing whitespace from every field
    pub trim: bool,
    /// Extra tokens read as missing, besides the empty field
    pub null_values: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
            null_values: Vec::new(),
        }
    }
}

impl LoadOptions {
    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable whitespace trimming
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Set the extra missing-value tokens
    pub fn with_null_values(mut self, values: Vec<String>) -> Self {
        self.null_values = values;
        self
    }

    /// Check whether a raw field counts as missing
    pub(crate) fn is_missing(&self, field: &str) -> bool {
        field.is_empty() || self.null_values.iter().any(|v| v == field)
    }
}

/// Options controlling how a table is written back to delimited text
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Field delimiter, a single ASCII byte
    pub delimiter: u8,
    /// Write the header line
    pub include_header: bool,
    /// Prefix every row with its zero-based index
    pub include_row_index: bool,
    /// Text written in place of missing cells
    pub missing_placeholder: String,
    /// Columns to emit, in this order; `None` emits all in table order
    pub columns: Option<Vec<String>>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
            include_row_index: true,
            missing_placeholder: String::new(),
            columns: None,
        }
    }
}

impl SaveOptions {
    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Toggle the header line
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Toggle the leading row-index column
    pub fn with_row_index(mut self, include: bool) -> Self {
        self.include_row_index = include;
        self
    }

    /// Set the placeholder for missing cells
    pub fn with_missing_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.missing_placeholder = placeholder.into();
        self
    }

    /// Restrict output to the given columns
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }
}
