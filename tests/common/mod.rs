#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_table::{Row, Table};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// The `id,score` table used throughout the docs.
pub fn scores() -> Table {
    let mut table = Table::new(["id", "score"]);
    table.append_row(["1", "10"]);
    table.append_row(["2", "abc"]);
    table.append_row(["3", "10"]);
    table
}

/// Values of `column` for each row, in the given order.
pub fn column_values(rows: &[&Row], column: &str) -> Vec<String> {
    rows.iter()
        .map(|row| row.value(column).unwrap_or_default().to_string())
        .collect()
}
