use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Query and edit CSV files as in-memory tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Select rows matching column criteria, optionally sorted and paged
    Query(QueryArgs),
    /// Delete rows matching column criteria and write the remaining table
    Remove(RemoveArgs),
    /// Append several CSV files into the first file's columns
    Append(AppendArgs),
    /// Show the rows holding the lowest or highest value of a column
    Extremes(ExtremesArgs),
}

/// Options shared by every command that reads a table.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Read plain RFC 4180 CSV, keeping backslashes literally
    #[arg(long)]
    pub rfc4180: bool,
    /// Treat the first line as data and name columns column_1..n
    #[arg(long = "no-header")]
    pub no_header: bool,
}

/// Options shared by every command that writes CSV.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output CSV file (stdout if omitted or '-')
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding for the output file/stdout (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Input CSV file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Match criteria of the form `column=value` (all must match)
    #[arg(short = 'w', long = "where", action = clap::ArgAction::Append)]
    pub criteria: Vec<String>,
    /// Columns to index before running the lookup
    #[arg(short = 'x', long = "index", action = clap::ArgAction::Append)]
    pub index: Vec<String>,
    /// Sort directives of the form `column[:asc|desc][:num]`
    #[arg(long = "sort", action = clap::ArgAction::Append)]
    pub sort: Vec<String>,
    /// Number of matches to skip (negative values count as zero)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,
    /// Maximum rows to emit (zero or negative means no limit)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub limit: i64,
    /// Render output as an aligned table to stdout
    #[arg(long = "table", conflicts_with = "json")]
    pub table: bool,
    /// Emit matching rows as a JSON array of objects
    #[arg(long = "json")]
    pub json: bool,
    #[command(flatten)]
    pub input_args: InputArgs,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Input CSV file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Match criteria of the form `column=value` (all must match)
    #[arg(short = 'w', long = "where", required = true, action = clap::ArgAction::Append)]
    pub criteria: Vec<String>,
    /// Columns to index before matching
    #[arg(short = 'x', long = "index", action = clap::ArgAction::Append)]
    pub index: Vec<String>,
    #[command(flatten)]
    pub input_args: InputArgs,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

#[derive(Debug, Args)]
pub struct AppendArgs {
    /// One or more CSV files to append
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    #[command(flatten)]
    pub input_args: InputArgs,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ExtremesArgs {
    /// Input CSV file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Column whose lowest (or highest) value selects the rows
    #[arg(short = 'c', long = "column")]
    pub column: String,
    /// Select the highest value instead of the lowest
    #[arg(long)]
    pub highest: bool,
    /// Index the column before searching
    #[arg(long = "index")]
    pub index: bool,
    /// Render output as an aligned table to stdout
    #[arg(long = "table")]
    pub table: bool,
    #[command(flatten)]
    pub input_args: InputArgs,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            if first == '"' || first == '\r' || first == '\n' {
                return Err(format!("Delimiter {first:?} is reserved"));
            }
            Ok(first as u8)
        }
    }
}
