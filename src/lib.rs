//! In-memory CSV tables with case-insensitive indexed lookup, chained
//! sorting, and a streaming reader and writer.
//!
//! ```
//! use csv_table::{Table, Window};
//!
//! let mut table = Table::new(["id", "score"]);
//! table.append_row(["1", "10"]);
//! table.append_row(["2", "abc"]);
//! table.add_index("score");
//! assert_eq!(table.find_matching_rows("score", "10", Window::all()).len(), 1);
//! ```

pub mod append;
pub mod cli;
pub mod commands;
pub mod dialect;
pub mod error;
pub mod header;
pub mod index;
pub mod io_utils;
pub mod pair;
pub mod reader;
pub mod render;
pub mod row;
pub mod sort;
pub mod table;
pub mod text;
pub mod window;
pub mod writer;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

pub use crate::{
    dialect::{Dialect, LineTerminator},
    error::{TableError, TableResult},
    header::Header,
    index::ColumnIndex,
    pair::{Criterion, Pair},
    reader::CsvReader,
    row::{ColumnKey, Row, RowId},
    sort::{SortCriteria, SortDirection, SortKind},
    table::Table,
    window::Window,
    writer::CsvWriter,
};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_table", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Query(args) => commands::query(&args),
        Commands::Remove(args) => commands::remove(&args),
        Commands::Append(args) => append::execute(&args),
        Commands::Extremes(args) => commands::extremes(&args),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
