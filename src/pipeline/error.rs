//! Error types for the minify pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::minifier::yaml::YamlError;

/// Errors that can occur during a guard cycle
#[derive(Error, Debug)]
pub enum PipelineError {
    /// I/O error while reading or writing the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool error
    #[error("Tool error: {0}")]
    Tool(#[from] crate::tools::ToolError),

    /// YAML compaction failed
    #[error("{0}")]
    Yaml(#[from] YamlError),

    /// External minifier exited with a non-zero status
    #[error("Command `{command}` failed with status code {code}\n---\n{output}")]
    ToolFailed {
        command: String,
        code: i32,
        output: String,
    },

    /// The minifier failed; the original bytes were restored
    #[error("There was error minifying {}:\n{diagnostic}", path.display())]
    MinifyFailed { path: PathBuf, diagnostic: String },

    /// The original bytes could not be written back
    #[error("Failed to restore {} after an error: {source}", path.display())]
    RestoreFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
