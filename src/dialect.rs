use serde::{Deserialize, Serialize};

pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_QUOTE: char = '"';

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Lf,
    CrLf,
}

impl LineTerminator {
    pub fn as_str(self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::CrLf => "\r\n",
        }
    }
}

/// Delimiter, quote, and line terminator shared by [`CsvWriter`] and
/// [`CsvReader`].
///
/// [`CsvWriter`]: crate::writer::CsvWriter
/// [`CsvReader`]: crate::reader::CsvReader
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Dialect {
    pub delimiter: char,
    pub quote: char,
    pub terminator: LineTerminator,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
            terminator: LineTerminator::Lf,
        }
    }
}

impl Dialect {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_terminator(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }
}
