//! Test fixture helpers for creating files to minify
//!
//! Every helper returns the `TempDir` alongside the paths; it must be kept
//! alive for the duration of the test.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// YAML with nested mappings, a list and a comment
pub const CI_YAML: &str = "\
# pipeline
name: build
on:
  push:
    branches:
      - main
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo test
";

/// Expected compaction of [`CI_YAML`]
pub const CI_YAML_COMPACT: &str = "\
name: build
on: {push: {branches: [main]}}
jobs: {test: {runs-on: ubuntu-latest,steps: [{uses: actions/checkout@v4},{run: cargo test}]}}
";

/// Markdown with trailing whitespace, a hard break and extra blank lines
pub const README_MD: &str = "# Title \n\nFirst line  \nsecond line\t\n\n\n\n- item\n\n";

/// Expected compaction of [`README_MD`]
pub const README_MD_COMPACT: &str = "# Title\n\nFirst line  \nsecond line\n\n- item\n";

/// Write one file into a fresh temporary directory
pub fn write_file(name: &str, contents: &str) -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok((temp_dir, path))
}

/// A small tree of in-process types plus a file no minifier handles
///
/// ```text
/// .github/workflows/ci.yml
/// docs/README.md
/// docs/notes.txt
/// assets/logo.bin
/// ```
pub fn create_project() -> anyhow::Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    fs::create_dir_all(root.join(".github/workflows"))?;
    fs::create_dir_all(root.join("docs"))?;
    fs::create_dir_all(root.join("assets"))?;

    fs::write(root.join(".github/workflows/ci.yml"), CI_YAML)?;
    fs::write(root.join("docs/README.md"), README_MD)?;
    fs::write(root.join("docs/notes.txt"), "todo   \r\n\r\n\r\n\r\ndone\r\n")?;
    fs::write(root.join("assets/logo.bin"), [0u8, 159, 146, 150])?;

    Ok(temp_dir)
}
