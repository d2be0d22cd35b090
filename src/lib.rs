#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! uniminify library
//!
//! Safe in-place minification for YAML, XML, SVG, JavaScript, Python, shell,
//! Markdown and plain-text files. Every file goes through a guard that keeps
//! the original bytes whenever minification fails or makes the file larger.
//!
//! # Basic Example
//!
//! Compacting YAML in process:
//!
//! ```
//! use uniminify::minifier::yaml::compact;
//!
//! let compacted = compact("foo:\n  key: value\nbar:\n  key2: value2\n").unwrap();
//! assert_eq!(compacted, "foo: {key: value}\nbar: {key2: value2}\n");
//! ```
//!
//! # Advanced Example: Guarded Minification
//!
//! Running one file through the guard:
//!
//! ```
//! use uniminify::config::PresetSelection;
//! use uniminify::minifier::MinifierSet;
//! use uniminify::pipeline::{FileTask, GuardOutcome, SafeMinifyGuard, ToolRunner};
//! use uniminify::tools::ToolPaths;
//! use tempfile::TempDir;
//!
//! let dir = TempDir::new().unwrap();
//! let path = dir.path().join("notes.md");
//! std::fs::write(&path, "# Notes \n\n\n\nDone.\n").unwrap();
//!
//! let task = FileTask::new(&path, &PresetSelection::default());
//! let minifiers = MinifierSet::new(ToolRunner::new(ToolPaths::new()));
//! let report = SafeMinifyGuard::new().run(&task, &minifiers).unwrap();
//!
//! assert!(matches!(report.outcome, GuardOutcome::Committed(_)));
//! assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Notes\n\nDone.\n");
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file and preset management
pub mod config;
/// Expansion of paths into files
pub mod enumerate;
/// Application errors with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// In-process compactors and external tool adapters
pub mod minifier;
/// Guarded per-file pipeline
pub mod pipeline;
/// Tool resolution and availability checks
pub mod tools;
