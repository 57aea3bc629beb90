//! CSV reader that inverts [`CsvWriter`](crate::writer::CsvWriter) output.
//!
//! Inside quoted fields doubled quotes collapse and `\\` becomes one backslash.
//! The escape text `\r` / `\n` turns back into control characters. Unquoted
//! fields are taken verbatim, so a literal backslash sequence outside quotes is
//! never rewritten. Raw line breaks inside quotes are accepted as field content.

use std::io::{BufRead, BufReader, Read};

use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use crate::{
    dialect::Dialect,
    error::{TableError, TableResult},
    table::Table,
};

/// Buffered reader that decodes its source into UTF-8.
pub type DecodingReader<R> = BufReader<DecodeReaderBytes<R, Vec<u8>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    AfterQuote,
}

pub struct CsvReader<R> {
    inner: R,
    dialect: Dialect,
    line_number: usize,
    buffer: String,
}

impl<R: Read> CsvReader<DecodingReader<R>> {
    /// Reads `source` encoded as `encoding`; a byte order mark, when present,
    /// takes precedence.
    ///
    /// UTF-8 input is validated rather than repaired: a malformed sequence
    /// fails the read with an `InvalidData` I/O error.
    pub fn decoding(source: R, encoding: &'static Encoding, dialect: Dialect) -> Self {
        let decoded = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .utf8_passthru(encoding == UTF_8)
            .bom_override(true)
            .strip_bom(true)
            .build(source);
        CsvReader::with_dialect(BufReader::new(decoded), dialect)
    }
}

impl<R: BufRead> CsvReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_dialect(inner, Dialect::default())
    }

    pub fn with_dialect(inner: R, dialect: Dialect) -> Self {
        CsvReader {
            inner,
            dialect,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Physical lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next record, or `None` at end of input.
    pub fn read_record(&mut self) -> TableResult<Option<Vec<String>>> {
        if !self.next_line()? {
            return Ok(None);
        }
        let first_line = self.line_number;
        let Dialect {
            delimiter, quote, ..
        } = self.dialect;

        let mut fields = Vec::new();
        let mut field = String::new();
        let mut state = FieldState::Start;

        loop {
            let line = std::mem::take(&mut self.buffer);
            let mut chars = line.chars().peekable();
            while let Some(ch) = chars.next() {
                match state {
                    FieldState::Quoted => {
                        if ch == quote {
                            if chars.peek() == Some(&quote) {
                                chars.next();
                                field.push(quote);
                            } else {
                                state = FieldState::AfterQuote;
                            }
                        } else if ch == '\\' {
                            match chars.peek() {
                                Some('r') => {
                                    chars.next();
                                    field.push('\r');
                                }
                                Some('n') => {
                                    chars.next();
                                    field.push('\n');
                                }
                                Some('\\') => {
                                    chars.next();
                                    field.push('\\');
                                }
                                _ => field.push(ch),
                            }
                        } else {
                            field.push(ch);
                        }
                    }
                    _ if ch == '\n' || (ch == '\r' && matches!(chars.peek(), None | Some('\n'))) => {
                        break;
                    }
                    _ if ch == delimiter => {
                        fields.push(std::mem::take(&mut field));
                        state = FieldState::Start;
                    }
                    FieldState::Start if ch == quote => state = FieldState::Quoted,
                    FieldState::Start | FieldState::Unquoted => {
                        field.push(ch);
                        state = FieldState::Unquoted;
                    }
                    FieldState::AfterQuote => {
                        return Err(TableError::Parse {
                            line: self.line_number,
                            reason: format!("unexpected '{ch}' after closing quote"),
                        });
                    }
                }
            }
            self.buffer = line;
            if state != FieldState::Quoted {
                break;
            }
            if !self.next_line()? {
                return Err(TableError::Parse {
                    line: first_line,
                    reason: "unterminated quoted field".to_string(),
                });
            }
        }

        fields.push(field);
        Ok(Some(fields))
    }

    /// Iterates over the remaining records.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }

    /// Builds a table from the remaining input.
    ///
    /// Without a header line the columns are named `column_1`, `column_2`, …
    /// after the widest record.
    pub fn read_table(mut self, has_header: bool) -> TableResult<Table> {
        if has_header {
            let Some(names) = self.read_record()? else {
                return Ok(Table::new(Vec::<String>::new()));
            };
            let mut table = Table::new(names);
            while let Some(record) = self.read_record()? {
                table.append_row(record);
            }
            return Ok(table);
        }

        let records = self.records().collect::<TableResult<Vec<_>>>()?;
        let width = records.iter().map(Vec::len).max().unwrap_or(0);
        let mut table = Table::new((1..=width).map(|n| format!("column_{n}")));
        for record in records {
            table.append_row(record);
        }
        Ok(table)
    }

    fn next_line(&mut self) -> TableResult<bool> {
        self.buffer.clear();
        if self.inner.read_line(&mut self.buffer)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }
}

pub struct Records<'r, R> {
    reader: &'r mut CsvReader<R>,
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = TableResult<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}
