//! Plain-text table rendering for terminal previews.

use std::borrow::Cow;

use itertools::Itertools;

use crate::{header::Header, row::Row};

/// Renders `rows` under `header` as left-aligned columns separated by two
/// spaces, with a dashed rule under the header.
pub fn render_rows(header: &Header, rows: &[&Row]) -> String {
    let mut widths = header
        .names()
        .iter()
        .map(|name| display_width(name))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.raw_values()) {
            *width = (*width).max(display_width(&sanitize_cell(cell)));
        }
    }
    // Every column is at least as wide as the three-dash rule.
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(header.names().iter().map(String::as_str), &widths));
    lines.push(format_line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        lines.push(format_line(row.raw_values().iter().map(String::as_str), &widths));
    }
    let mut output = lines.join("\n");
    output.push('\n');
    output
}

pub fn print_rows(header: &Header, rows: &[&Row]) {
    print!("{}", render_rows(header, rows));
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let cell = sanitize_cell(cell);
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .join("  ");
    line.trim_end_matches(' ').to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
