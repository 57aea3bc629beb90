mod common;

use common::{column_values, scores};
use csv_table::{Criterion, Header, Pair, Table, TableError, Window};

#[test]
fn indexed_lookup_scenario_matches_documented_output() {
    let mut table = scores();
    table.add_index("score");

    let rows = table.find_matching_rows("score", "10", Window::all());
    assert_eq!(column_values(&rows, "id"), ["1", "3"]);

    let second = table.row_at(1).expect("second row");
    let err = second.double("score").expect_err("abc is not a number");
    assert!(matches!(err, TableError::Format { ref column, .. } if column == "score"));
    assert_eq!(second.double_or("score", 0.0), 0.0);

    let text = String::from_utf8(table.to_bytes().expect("serialize")).expect("utf8");
    assert_eq!(text, "\"id\",\"score\"\n1,10\n2,abc\n3,10\n");
}

#[test]
fn header_comparison_ignores_case() {
    let table = Table::new(["ID", "Score"]);
    assert_eq!(table.header(), &Header::new(["id", "score"]));
    assert_ne!(table.header(), &Header::new(["id"]));
    assert!(table.header().contains_all(["score", "ID"]));
}

#[test]
fn append_record_fills_named_columns_only() {
    let mut table = Table::new(["a", "b", "c"]);
    let id = table.append_record([("C", "3"), ("a", "1"), ("zzz", "ignored")]);
    let row = table.row(id).expect("appended row");
    assert_eq!(row.raw_values(), &["1", "", "3"]);
    assert!(!row.is_empty());

    let empty = table.append_empty_row();
    assert!(table.row(empty).expect("empty row").is_empty());
    assert_eq!(table.len(), 2);
}

#[test]
fn from_rows_copies_positional_values() {
    let source = scores();
    let copy = Table::from_rows(source.header().clone(), source.rows());
    assert_eq!(copy.len(), 3);
    assert_eq!(copy.row_at(2).expect("row").value(1), Some("10"));
}

#[test]
fn append_all_from_matches_columns_by_name() {
    let mut target = Table::new(["id", "name", "extra"]);
    let mut other = Table::new(["NAME", "id", "ignored"]);
    other.append_row(["ann", "7", "x"]);
    target.append_all_from(&other);
    assert_eq!(target.row_at(0).expect("row").raw_values(), &["7", "ann", ""]);
}

#[test]
fn paging_clips_both_indexed_and_scanned_results() {
    let mut table = Table::new(["k"]);
    for _ in 0..5 {
        table.append_row(["x"]);
    }
    let scanned = table.find_matching_rows("k", "X", Window::new(3, 10)).len();
    table.add_index("k");
    let indexed = table.find_matching_rows("k", "X", Window::new(3, 10)).len();
    assert_eq!((scanned, indexed), (2, 2));
    assert_eq!(table.find_matching_rows("k", "x", Window::new(-4, 0)).len(), 5);
    assert!(table.find_matching_rows("k", "x", Window::new(9, 1)).is_empty());
}

#[test]
fn multi_criteria_filter_requires_every_match() {
    let mut table = Table::new(["city", "kind", "name"]);
    table.append_row(["Oslo", "cafe", "a"]);
    table.append_row(["oslo", "bar", "b"]);
    table.append_row(["OSLO", "cafe", "c"]);
    table.append_row(["Rome", "cafe", "d"]);
    table.add_index("city");

    let criteria = vec![
        Criterion::criterion("city", "oslo"),
        Criterion::criterion("kind", "CAFE"),
    ];
    let rows = table.find_matching_rows_all(&criteria, Window::all()).expect("filter");
    assert_eq!(column_values(&rows, "name"), ["a", "c"]);
    assert_eq!(table.count_matching_rows(&criteria).expect("count"), 2);
    assert!(table.has_match_all(&criteria).expect("has match"));

    let unknown = [Pair::new("city", "oslo"), Pair::new("nope", "x")];
    assert!(table.find_matching_rows_all(&unknown, Window::all()).expect("filter").is_empty());
    assert_eq!(table.count_matching_rows(&unknown).expect("count"), 0);
    assert!(!table.has_match_all(&unknown).expect("has match"));

    let none: [Pair<&str, &str>; 0] = [];
    assert!(matches!(
        table.find_matching_rows_all(&none, Window::all()),
        Err(TableError::InvalidArgument(_))
    ));
}

#[test]
fn remove_matching_rows_keeps_indexes_in_step() {
    let mut table = scores();
    table.add_index("score");
    let removed = table
        .remove_matching_rows(&[Criterion::criterion("score", "10")])
        .expect("remove");
    assert_eq!(removed, 2);
    assert_eq!(table.len(), 1);
    assert!(!table.has_match("score", "10"));
    assert_eq!(table.lookup_value("score", "ABC", "id"), Some("2"));
}

#[test]
fn lookup_helpers_fall_back_on_misses() {
    let table = scores();
    assert_eq!(table.lookup_int_or("id", "3", "score", -1), 10);
    assert_eq!(table.lookup_int_or("id", "2", "score", -1), -1);
    assert_eq!(table.lookup_int_or("id", "9", "score", -1), -1);
    assert_eq!(table.lookup_value("missing", "1", "score"), None);
}

#[test]
fn lowest_rows_skip_blanks_with_and_without_index() {
    let mut table = Table::new(["x", "tag"]);
    table.append_row(["", "blank"]);
    table.append_row(["b", "b"]);
    table.append_row(["a", "first"]);
    table.append_row(["A", "second"]);

    let scanned = table.find_lowest_rows("x").expect("column exists");
    assert_eq!(column_values(&scanned, "tag"), ["first", "second"]);
    table.add_index("x");
    let indexed = table.find_lowest_rows("x").expect("column exists");
    assert_eq!(column_values(&indexed, "tag"), ["first", "second"]);
    let highest = table.find_highest_rows("x").expect("column exists");
    assert_eq!(column_values(&highest, "tag"), ["b"]);
    assert!(table.find_lowest_rows("nope").is_none());
}

#[test]
fn all_blank_column_has_no_extremes() {
    let mut table = Table::new(["x"]);
    table.append_row([""]);
    table.append_row(["  "]);
    assert!(table.find_lowest_rows("x").expect("column").is_empty());
    table.add_index("x");
    assert!(table.find_highest_rows("x").expect("column").is_empty());
}

#[test]
fn clear_value_empties_the_cell_and_its_index_entry() {
    let mut table = scores();
    table.add_index("id");
    let first = table.row_ids()[0];
    assert!(table.clear_value(first, "id"));
    assert!(!table.has_match("id", "1"));
    assert_eq!(table.row(first).expect("row").value_or("id", "none"), "none");
    assert!(table.is_indexed("ID"));
    assert!(!table.is_indexed("score"));
}

#[test]
fn rows_serialize_to_json_objects() {
    let table = scores();
    let json = serde_json::to_string(&table.rows().collect::<Vec<_>>()).expect("json");
    assert_eq!(
        json,
        r#"[{"id":"1","score":"10"},{"id":"2","score":"abc"},{"id":"3","score":"10"}]"#
    );
}
