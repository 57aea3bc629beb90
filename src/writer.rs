//! Streaming CSV writer.
//!
//! A data cell is quoted only when it contains the delimiter, the quote
//! character, or a raw carriage return / line feed. Inside quotes, quote
//! characters are doubled and a backslash is written as `\\`. CR/LF become the
//! two-character text `\r` and `\n`, so every record occupies exactly one
//! physical line. Header names are always quoted.

use std::io::Write;

use encoding_rs::{Encoding, UTF_8};

use crate::{
    dialect::Dialect,
    error::{TableError, TableResult},
    header::Header,
    row::Row,
    table::Table,
};

pub struct CsvWriter<W: Write> {
    inner: W,
    dialect: Dialect,
    encoding: &'static Encoding,
    line: String,
    at_line_start: bool,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_dialect(inner, Dialect::default())
    }

    pub fn with_dialect(inner: W, dialect: Dialect) -> Self {
        CsvWriter {
            inner,
            dialect,
            encoding: UTF_8,
            line: String::new(),
            at_line_start: true,
        }
    }

    /// Transcodes output to `encoding` instead of UTF-8.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Writes the header (optionally) and every row of `table`, then flushes
    /// the underlying stream. The stream stays open so further tables can be
    /// written to the same destination.
    pub fn write_table(&mut self, table: &Table, include_header: bool) -> TableResult<()> {
        let written = self.write_table_body(table, include_header);
        let flushed = self.flush();
        written.and(flushed)
    }

    fn write_table_body(&mut self, table: &Table, include_header: bool) -> TableResult<()> {
        if include_header {
            self.write_header(table.header())?;
        }
        for row in table.rows() {
            self.write_row(row)?;
        }
        Ok(())
    }

    pub fn write_header(&mut self, header: &Header) -> TableResult<()> {
        for name in header.names() {
            self.write_quoted(name);
        }
        self.end_line()
    }

    pub fn write_row(&mut self, row: &Row) -> TableResult<()> {
        for value in row.raw_values() {
            self.write_text(value);
        }
        self.end_line()
    }

    /// Appends one cell, quoting it only when required.
    pub fn write_text(&mut self, value: &str) {
        if self.needs_quotes(value) {
            self.write_quoted(value);
        } else {
            self.start_entry();
            self.line.push_str(value);
        }
    }

    /// Appends one cell, always quoted.
    pub fn write_quoted(&mut self, value: &str) {
        self.start_entry();
        let quote = self.dialect.quote;
        self.line.push(quote);
        for ch in value.chars() {
            match ch {
                c if c == quote => {
                    self.line.push(quote);
                    self.line.push(quote);
                }
                '\\' => self.line.push_str("\\\\"),
                '\r' => self.line.push_str("\\r"),
                '\n' => self.line.push_str("\\n"),
                other => self.line.push(other),
            }
        }
        self.line.push(quote);
    }

    pub fn write_int(&mut self, value: i64) {
        self.write_raw(&value.to_string());
    }

    pub fn write_float(&mut self, value: f64) {
        self.write_raw(&format_float(value));
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_raw(if value { "true" } else { "false" });
    }

    pub fn end_line(&mut self) -> TableResult<()> {
        self.line.push_str(self.dialect.terminator.as_str());
        self.drain_line()?;
        self.at_line_start = true;
        Ok(())
    }

    /// Pushes any partially written line and flushes the underlying stream.
    pub fn flush(&mut self) -> TableResult<()> {
        self.drain_line()?;
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes and hands back the underlying stream, ending this writer.
    pub fn finish(mut self) -> TableResult<W> {
        self.flush()?;
        Ok(self.inner)
    }

    fn write_raw(&mut self, value: &str) {
        self.start_entry();
        self.line.push_str(value);
    }

    fn start_entry(&mut self) {
        if self.at_line_start {
            self.at_line_start = false;
        } else {
            self.line.push(self.dialect.delimiter);
        }
    }

    fn needs_quotes(&self, value: &str) -> bool {
        let Dialect {
            delimiter, quote, ..
        } = self.dialect;
        value.contains(|c: char| c == delimiter || c == quote || c == '\r' || c == '\n')
    }

    fn drain_line(&mut self) -> TableResult<()> {
        if self.line.is_empty() {
            return Ok(());
        }
        if self.encoding == UTF_8 {
            self.inner.write_all(self.line.as_bytes())?;
        } else {
            let (encoded, _, had_errors) = self.encoding.encode(&self.line);
            if had_errors {
                return Err(TableError::Encoding {
                    action: "encode",
                    encoding: self.encoding.name(),
                });
            }
            self.inner.write_all(&encoded)?;
        }
        self.line.clear();
        Ok(())
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{value:?}")
    }
}
