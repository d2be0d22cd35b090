//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Test fixture creation utilities
//! - Tool availability checks for tests that need real minifiers
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures;
//!
//! fn test_yaml_file() {
//!     let (dir, path) = fixtures::write_file("ci.yml", "a:\n  b: c\n").unwrap();
//! }
//! ```

pub mod fixtures;

/// Check if running in CI environment
#[allow(dead_code)]
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}

/// Check if an external tool is on PATH
#[allow(dead_code)]
pub fn has_tool(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Macro to skip tests when an external tool is not available
#[macro_export]
macro_rules! require_tool {
    ($name:expr) => {
        if !$crate::common::has_tool($name) {
            eprintln!("Skipping test: {} not installed", $name);
            return;
        }
    };
}
