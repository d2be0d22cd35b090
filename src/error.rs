//! Application-level errors with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes
//! - Proper exit codes for scripts and CI
//!
//! # Examples
//!
//! ```no_run
//! use uniminify::error::{ErrorFormatter, MinifyError};
//!
//! let err = anyhow::Error::new(MinifyError::FilesFailed { failed: 2, total: 5 });
//! eprintln!("{}", ErrorFormatter::format(&err));
//! std::process::exit(ErrorFormatter::exit_code(&err));
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::enumerate::EnumerateError;
use crate::pipeline::PipelineError;

/// Errors that end a uniminify run
#[derive(Error, Debug)]
pub enum MinifyError {
    /// A path given on the command line does not exist
    #[error("Path not found: {}", path.display())]
    PathNotFound {
        /// The path as given by the user
        path: PathBuf,
    },

    /// Required tool is not installed
    #[error("Tool not installed: {tool}")]
    ToolMissing {
        /// Tool name
        tool: String,
        /// How to install it
        install_hint: String,
    },

    /// Some files could not be minified; the rest were processed
    #[error("{failed} of {total} files failed to minify")]
    FilesFailed { failed: usize, total: usize },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Pipeline error outside of a per-file cycle
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

impl From<EnumerateError> for MinifyError {
    fn from(err: EnumerateError) -> Self {
        match err {
            EnumerateError::NotFound(path) => Self::PathNotFound { path },
            EnumerateError::Io { path, source } => Self::Io {
                context: format!("reading {}", path.display()),
                source,
            },
        }
    }
}

impl MinifyError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use uniminify::error::MinifyError;
    ///
    /// let error = MinifyError::ToolMissing {
    ///     tool: "svgo".to_string(),
    ///     install_hint: "npm install -g svgo".to_string(),
    /// };
    ///
    /// assert!(error.suggestion().unwrap().contains("npm install"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::PathNotFound { path } => Some(format!(
                "Check that {} exists and is spelled correctly",
                path.display()
            )),
            Self::ToolMissing { tool, install_hint } => Some(format!(
                "Install with: {install_hint}\nOr point [tools] {tool} in .uniminify.toml at an existing executable"
            )),
            Self::FilesFailed { .. } => Some(
                "Failed files were left untouched; rerun with --verbose for tool output".to_string(),
            ),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {context} is possible"
            )),
            Self::Pipeline(PipelineError::RestoreFailed { path, .. }) => Some(format!(
                "{} may be left minified or partially written; restore it from version control",
                path.display()
            )),
            Self::Pipeline(_) => None,
        }
    }

    /// Get documentation URL for this error.
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::ToolMissing { .. } => Some("https://github.com/uniminify/uniminify#external-tools"),
            _ => None,
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes based on the error type, following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use uniminify::error::MinifyError;
    /// use std::path::PathBuf;
    ///
    /// let error = MinifyError::PathNotFound { path: PathBuf::from("missing/") };
    /// assert_eq!(error.exit_code(), 66); // EX_NOINPUT
    ///
    /// let failed = MinifyError::FilesFailed { failed: 1, total: 3 };
    /// assert_eq!(failed.exit_code(), 1);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PathNotFound { .. } => 66,  // EX_NOINPUT (sysexits.h)
            Self::ToolMissing { .. } => 127,  // Command not found (Unix convention)
            Self::FilesFailed { .. } => 1,    // Generic error
            Self::Io { .. } => 74,            // EX_IOERR
            Self::Pipeline(_) => 1,           // Generic error
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions and documentation links
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        // Main error message
        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(app_error) = error.downcast_ref::<MinifyError>() {
            if let Some(suggestion) = app_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }

            if let Some(docs) = app_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(app_error) = error.downcast_ref::<MinifyError>() {
            app_error.exit_code()
        } else {
            1 // Generic error
        }
    }
}
