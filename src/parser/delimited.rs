//! Delimited text record source

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Split};
use std::path::Path;

use crate::error::{Result, TableError};

use super::Record;

/// Splits delimited text into records, one per physical line, header first.
///
/// Quoting is disabled: a field containing the delimiter is split like any
/// other text. Blank lines are yielded as a record with one empty field, so a
/// one-column table keeps its missing cells. A trailing `\r` is dropped.
pub struct DelimitedSource<R: Read> {
    lines: Split<BufReader<R>>,
    delimiter: char,
    line: u64,
}

impl DelimitedSource<File> {
    /// Open a file as a record source
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "opened delimited source");
        Self::from_reader(file, delimiter)
    }
}

impl<R: Read> DelimitedSource<R> {
    /// Wrap any reader as a record source. The delimiter must be ASCII.
    pub fn from_reader(reader: R, delimiter: u8) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(TableError::Delimiter(delimiter));
        }

        Ok(Self {
            lines: BufReader::new(reader).split(b'\n'),
            delimiter: char::from(delimiter),
            line: 0,
        })
    }

    fn split(&self, mut bytes: Vec<u8>) -> Result<Record> {
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let text = String::from_utf8(bytes)
            .map_err(|e| TableError::format(self.line, format!("invalid UTF-8: {}", e)))?;
        let fields = text.split(self.delimiter).map(str::to_string).collect();
        Ok(Record::new(self.line, fields))
    }
}

impl<R: Read> Iterator for DelimitedSource<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.lines.next()?;
        self.line += 1;
        Some(bytes.map_err(TableError::from).and_then(|bytes| self.split(bytes)))
    }
}
