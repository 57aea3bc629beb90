//! File, stream, and encoding plumbing for the command-line front end.
//!
//! The table core only sees readers and writers; everything that knows about
//! paths lives here:
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` → comma,
//!   `.tsv` → tab) with manual override support.
//! - **Encoding**: input decoding and output transcoding via `encoding_rs`,
//!   defaulting to UTF-8.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.
//! - **Plain RFC 4180 import** through the `csv` crate, for files whose
//!   backslashes must be kept literally.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

use crate::{
    dialect::Dialect,
    error::{TableError, TableResult},
    reader::CsvReader,
    table::Table,
    writer::CsvWriter,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// How an input file should be interpreted.
#[derive(Debug, Clone, Copy)]
pub struct InputOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub has_header: bool,
    pub rfc4180: bool,
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    if let Some(path) = path {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => return DEFAULT_TSV_DELIMITER,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => return DEFAULT_CSV_DELIMITER,
            _ => {}
        }
    }
    fallback
}

pub fn dialect_for(delimiter: u8) -> Dialect {
    Dialect::default().with_delimiter(char::from(delimiter))
}

pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        Ok(Box::new(io::stdin().lock()))
    } else {
        let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_dash(p) => Ok(Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        ))),
        _ => Ok(Box::new(io::stdout())),
    }
}

/// Loads a whole table from `path` (or stdin for `-`).
pub fn load_table(path: &Path, options: &InputOptions) -> Result<Table> {
    let source = open_input(path)?;
    let table = if options.rfc4180 {
        read_rfc4180_table(source, options.delimiter, options.has_header, options.encoding)
    } else {
        CsvReader::decoding(source, options.encoding, dialect_for(options.delimiter))
            .read_table(options.has_header)
    };
    table.with_context(|| format!("Reading table from {path:?}"))
}

/// Writes `table` to `path` (or stdout when absent or `-`).
pub fn save_table(
    path: Option<&Path>,
    table: &Table,
    delimiter: u8,
    encoding: &'static Encoding,
    include_header: bool,
) -> Result<()> {
    let sink = open_output(path)?;
    let mut writer = CsvWriter::with_dialect(sink, dialect_for(delimiter)).with_encoding(encoding);
    writer
        .write_table(table, include_header)
        .with_context(|| match path {
            Some(p) if !is_dash(p) => format!("Writing table to {p:?}"),
            _ => "Writing table to stdout".to_string(),
        })
}

/// Reads standard RFC 4180 CSV (raw line breaks inside quotes, no backslash
/// escapes) into a table.
pub fn read_rfc4180_table<R: Read>(
    reader: R,
    delimiter: u8,
    has_header: bool,
    encoding: &'static Encoding,
) -> TableResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for record in reader.byte_records() {
        records.push(decode_record(&record?, encoding)?);
    }

    let mut table = if has_header {
        Table::new(decode_record(reader.byte_headers()?, encoding)?)
    } else {
        let width = records.iter().map(Vec::len).max().unwrap_or(0);
        Table::new((1..=width).map(|n| format!("column_{n}")))
    };
    for record in records {
        table.append_row(record);
    }
    Ok(table)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> TableResult<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(TableError::Encoding {
            action: "decode",
            encoding: encoding.name(),
        })
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> TableResult<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsv_extension_selects_tab_delimiter() {
        assert_eq!(resolve_input_delimiter(Path::new("data.TSV"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("data.csv"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("data.tsv"), Some(b';')), b';');
        assert_eq!(resolve_output_delimiter(None, None, b'|'), b'|');
    }

    #[test]
    fn rfc4180_import_keeps_backslashes_literal() {
        let input = "path,note\nC:\\new,\"two\nlines\"\n";
        let table = read_rfc4180_table(input.as_bytes(), b',', true, UTF_8).unwrap();
        let row = table.row_at(0).unwrap();
        assert_eq!(row.value("path"), Some("C:\\new"));
        assert_eq!(row.raw_values()[1], "two\nlines");
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        assert!(resolve_encoding(Some("klingon")).is_err());
        assert_eq!(resolve_encoding(Some("latin1")).unwrap().name(), "windows-1252");
    }
}
