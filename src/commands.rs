//! `query`, `remove`, and `extremes` subcommands.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    cli::{ExtremesArgs, InputArgs, OutputArgs, QueryArgs, RemoveArgs},
    io_utils::{self, InputOptions},
    pair::Criterion,
    printable_delimiter, render,
    row::Row,
    sort::{SortCriteria, SortDirection, SortKind},
    table::Table,
    window::Window,
};

pub fn query(args: &QueryArgs) -> Result<()> {
    let criteria = parse_criteria(&args.criteria)?;
    let sort = parse_sort_chain(&args.sort)?;
    let window = Window::new(args.offset, args.limit);

    let mut table = load(&args.input, &args.input_args)?;
    for column in &args.index {
        table.add_index(column.as_str());
    }

    let rows = select_rows(&table, &criteria, sort.as_ref(), window)?;
    info!(
        "Selected {} of {} row(s) from {:?}",
        rows.len(),
        table.len(),
        args.input
    );

    if args.json {
        let mut sink = io_utils::open_output(args.output_args.output.as_deref())?;
        serde_json::to_writer_pretty(&mut sink, &rows).context("Serializing rows as JSON")?;
        writeln!(sink)?;
        sink.flush()?;
        return Ok(());
    }
    if args.table {
        render::print_rows(table.header(), &rows);
        return Ok(());
    }
    let selected = Table::from_rows(table.header().clone(), rows);
    write_output(&selected, &args.input, &args.input_args, &args.output_args)
}

pub fn remove(args: &RemoveArgs) -> Result<()> {
    let criteria = parse_criteria(&args.criteria)?;
    let mut table = load(&args.input, &args.input_args)?;
    for column in &args.index {
        table.add_index(column.as_str());
    }
    let removed = table
        .remove_matching_rows(&criteria)
        .with_context(|| format!("Removing rows from {:?}", args.input))?;
    info!(
        "Removed {removed} row(s); {} row(s) remain in {:?}",
        table.len(),
        args.input
    );
    write_output(&table, &args.input, &args.input_args, &args.output_args)
}

pub fn extremes(args: &ExtremesArgs) -> Result<()> {
    let mut table = load(&args.input, &args.input_args)?;
    if args.index {
        table.add_index(args.column.as_str());
    }
    let rows = if args.highest {
        table.find_highest_rows(args.column.as_str())
    } else {
        table.find_lowest_rows(args.column.as_str())
    }
    .ok_or_else(|| anyhow!("Column '{}' not found in {:?}", args.column, args.input))?;
    info!(
        "{} {} row(s) share the {} value of '{}'",
        if rows.is_empty() { "No" } else { "Found" },
        rows.len(),
        if args.highest { "highest" } else { "lowest" },
        args.column
    );

    if args.table {
        render::print_rows(table.header(), &rows);
        return Ok(());
    }
    let selected = Table::from_rows(table.header().clone(), rows);
    write_output(&selected, &args.input, &args.input_args, &args.output_args)
}

/// Matching rows in output order: criteria first, then the sort chain, then
/// the paging window.
pub fn select_rows<'t>(
    table: &'t Table,
    criteria: &[Criterion],
    sort: Option<&SortCriteria>,
    window: Window,
) -> Result<Vec<&'t Row>> {
    let Some(sort) = sort else {
        if criteria.is_empty() {
            return Ok(window.apply(table.rows().collect()));
        }
        return Ok(table.find_matching_rows_all(criteria, window)?);
    };

    let mut rows = if criteria.is_empty() {
        table.rows().collect::<Vec<_>>()
    } else {
        table.find_matching_rows_all(criteria, Window::all())?
    };
    debug!("Sorting {} row(s) by {sort}", rows.len());
    rows.sort_by(|left, right| sort.compare(left, right));
    Ok(window.apply(rows))
}

/// Parses repeated `column=value` flags.
pub fn parse_criteria(specs: &[String]) -> Result<Vec<Criterion>> {
    specs
        .iter()
        .map(|spec| {
            let (column, value) = spec
                .split_once('=')
                .ok_or_else(|| anyhow!("Criterion '{spec}' must look like column=value"))?;
            let column = column.trim();
            if column.is_empty() {
                return Err(anyhow!("Criterion '{spec}' is missing a column"));
            }
            Ok(Criterion::criterion(column, value))
        })
        .collect()
}

/// Folds repeated `column[:asc|desc][:num]` flags into one chain.
pub fn parse_sort_chain(specs: &[String]) -> Result<Option<SortCriteria>> {
    let mut chain: Option<SortCriteria> = None;
    for spec in specs {
        let criteria = parse_sort_directive(spec)?;
        chain = Some(match chain {
            Some(head) => head.append(criteria),
            None => criteria,
        });
    }
    Ok(chain)
}

fn parse_sort_directive(spec: &str) -> Result<SortCriteria> {
    let mut parts = spec.split(':');
    let column = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("Sort directive is missing a column"))?;
    let mut direction = SortDirection::Asc;
    let mut kind = SortKind::Lexical;
    for part in parts {
        match part.trim().to_ascii_lowercase().as_str() {
            "asc" => direction = SortDirection::Asc,
            "desc" => direction = SortDirection::Desc,
            "num" | "numeric" => kind = SortKind::Numeric,
            "text" | "lexical" => kind = SortKind::Lexical,
            other => return Err(anyhow!("Unknown sort option '{other}' in '{spec}'")),
        }
    }
    Ok(SortCriteria::new(column, kind, direction))
}

pub(crate) fn input_options(path: &std::path::Path, args: &InputArgs) -> Result<InputOptions> {
    Ok(InputOptions {
        delimiter: io_utils::resolve_input_delimiter(path, args.delimiter),
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        has_header: !args.no_header,
        rfc4180: args.rfc4180,
    })
}

fn load(path: &std::path::Path, args: &InputArgs) -> Result<Table> {
    let options = input_options(path, args)?;
    info!(
        "Loading '{}' with delimiter '{}'",
        path.display(),
        printable_delimiter(options.delimiter)
    );
    io_utils::load_table(path, &options)
}

pub(crate) fn write_output(
    table: &Table,
    input: &std::path::Path,
    input_args: &InputArgs,
    output_args: &OutputArgs,
) -> Result<()> {
    let input_delimiter = io_utils::resolve_input_delimiter(input, input_args.delimiter);
    let delimiter = io_utils::resolve_output_delimiter(
        output_args.output.as_deref(),
        output_args.output_delimiter,
        input_delimiter,
    );
    let encoding: &'static Encoding =
        io_utils::resolve_encoding(output_args.output_encoding.as_deref())?;
    io_utils::save_table(
        output_args.output.as_deref(),
        table,
        delimiter,
        encoding,
        !input_args.no_header,
    )
}
