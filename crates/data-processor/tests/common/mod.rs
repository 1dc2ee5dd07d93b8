#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::{TempDir, tempdir};

/// Absolute path to a fixture under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Scratch directory that is removed on drop.
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

    /// Output directory inside the workspace. Not created.
    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    /// Write raw bytes into a file under the workspace and return its path.
    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    /// Copy a fixture into the workspace under a new name.
    pub fn copy_fixture(&self, fixture: &str, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::copy(fixture_path(fixture), &path).expect("copy fixture");
        path
    }
}

/// Parse a JSON artifact from an output directory.
pub fn read_json(dir: &Path, name: &str) -> Value {
    let contents = fs::read_to_string(dir.join(name)).expect("read json artifact");
    serde_json::from_str(&contents).expect("parse json artifact")
}

/// Header line and data lines of a CSV artifact.
pub fn read_csv_lines(path: &Path) -> (String, Vec<String>) {
    let contents = fs::read_to_string(path).expect("read csv");
    let mut lines = contents.lines().map(str::to_string);
    let header = lines.next().unwrap_or_default();
    (header, lines.collect())
}
