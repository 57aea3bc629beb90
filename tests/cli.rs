mod common;

use std::fs;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::prelude::*;
use predicates::str::contains;

const PEOPLE: &str = "name,team,age\nann,red,31\nbob,blue,9\ncy,Red,100\ndee,red,\n";

fn csv_table() -> Command {
    Command::cargo_bin("csv-table").expect("binary exists")
}

#[test]
fn query_filters_sorts_and_pages() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("people.csv", PEOPLE);

    csv_table()
        .args(["query", "-i", input.to_str().unwrap()])
        .args(["--where", "team=RED", "--index", "team"])
        .args(["--sort", "age:asc:num", "--limit", "2"])
        .assert()
        .success()
        .stdout("\"name\",\"team\",\"age\"\nann,red,31\ncy,Red,100\n");
}

#[test]
fn query_emits_json_objects() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("people.csv", PEOPLE);

    let output = csv_table()
        .args(["query", "-i", input.to_str().unwrap(), "--where", "name=bob", "--json"])
        .output()
        .expect("run query");
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(rows, serde_json::json!([{ "name": "bob", "team": "blue", "age": "9" }]));
}

#[test]
fn query_renders_a_preview_table() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("people.csv", PEOPLE);

    csv_table()
        .args(["query", "-i", input.to_str().unwrap(), "--where", "team=blue", "--table"])
        .assert()
        .success()
        .stdout(contains("name  team  age").and(contains("bob   blue  9")));
}

#[test]
fn query_reads_stdin_and_tab_delimited_output() {
    csv_table()
        .args(["query", "-i", "-", "--where", "age=9", "--output-delimiter", "tab"])
        .write_stdin(PEOPLE)
        .assert()
        .success()
        .stdout("\"name\"\t\"team\"\t\"age\"\nbob\tblue\t9\n");
}

#[test]
fn remove_writes_remaining_rows_to_file() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("people.csv", PEOPLE);
    let output = workspace.join("kept.csv");

    csv_table()
        .args(["remove", "-i", input.to_str().unwrap(), "--where", "team=red"])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read output");
    assert_eq!(contents, "\"name\",\"team\",\"age\"\nbob,blue,9\n");
}

#[test]
fn append_aligns_later_files_by_column_name() {
    let workspace = TestWorkspace::new();
    let first = workspace.write("a.csv", "id,name\n1,ann\n");
    let second = workspace.write("b.csv", "NAME,id,extra\nbob,2,x\n");

    csv_table()
        .args(["append", "-i", first.to_str().unwrap(), "-i", second.to_str().unwrap()])
        .assert()
        .success()
        .stdout("\"id\",\"name\"\n1,ann\n2,bob\n");
}

#[test]
fn extremes_report_ties_and_skip_blanks() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("x.csv", "x,tag\n,blank\nb,b\na,first\nA,second\n");

    csv_table()
        .args(["extremes", "-i", input.to_str().unwrap(), "--column", "x", "--index"])
        .assert()
        .success()
        .stdout("\"x\",\"tag\"\na,first\nA,second\n");

    csv_table()
        .args(["extremes", "-i", input.to_str().unwrap(), "-c", "x", "--highest"])
        .assert()
        .success()
        .stdout("\"x\",\"tag\"\nb,b\n");
}

#[test]
fn rfc4180_input_keeps_backslashes() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("paths.csv", "path\n\"C:\\new\"\n");

    csv_table()
        .args(["query", "-i", input.to_str().unwrap(), "--rfc4180", "--json"])
        .assert()
        .success()
        .stdout(contains(r#""path": "C:\\new""#));
}

#[test]
fn missing_extremes_column_fails_with_context() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("x.csv", "x\n1\n");

    csv_table()
        .args(["extremes", "-i", input.to_str().unwrap(), "--column", "nope"])
        .assert()
        .failure()
        .stderr(contains("Column 'nope' not found"));
}

#[test]
fn malformed_criterion_is_rejected() {
    csv_table()
        .args(["query", "-i", "people.csv", "--where", "team"])
        .assert()
        .failure()
        .stderr(contains("must look like column=value"));
}

#[test]
fn invalid_utf8_input_fails_instead_of_being_repaired() {
    let workspace = TestWorkspace::new();
    let input = workspace.join("latin1.csv");
    fs::write(&input, b"name\ncaf\xe9\n").expect("write input");

    csv_table()
        .args(["query", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Reading table from"));

    csv_table()
        .args(["query", "-i", input.to_str().unwrap(), "--input-encoding", "windows-1252", "--json"])
        .assert()
        .success()
        .stdout(contains("café"));
}
