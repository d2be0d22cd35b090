//! YAML compaction
//!
//! Parses a document into a [`YamlValue`] tree and writes it back in the most
//! compact form that re-parses to the same tree:
//! - block style for the top-level mapping, flow style below it
//! - shortest legal quoting for every string
//! - `%YAML 1.1` documents keep their preamble and use `y`/`n` booleans
//!
//! The output is parsed again before it is accepted; any difference is a
//! [`YamlError::RoundTripMismatch`] and the file is left alone.

mod emit;
mod parse;
mod scalar;
mod value;

pub use emit::{render_document, render_document_with, serialize, serialize_with};
pub use parse::{parse_body, parse_document, parse_document_as, split_preamble, YamlDocument};
pub use scalar::{is_plain_safe, write_string, write_string_with, Context, ScalarRules};
pub use value::{YamlNumber, YamlValue, YamlVersion};

use std::path::Path;

use thiserror::Error;

use super::{Minifier, MinifyOutcome};
use crate::infra::FileSystem;
use crate::pipeline::dispatch::FileTask;
use crate::pipeline::error::PipelineError;

/// Errors raised while compacting a YAML document
#[derive(Error, Debug)]
pub enum YamlError {
    /// The document is not valid YAML
    #[error("YAML parse error: {0}")]
    Parse(#[from] yaml_rust2::scanner::ScanError),

    /// A node carries an explicit tag
    #[error("Unsupported tag: {0}")]
    UnsupportedTag(String),

    /// A mapping key is a sequence or a mapping
    #[error("Mapping keys must be scalars")]
    ComplexKey,

    #[error("Integer does not fit in 64 bits: {0}")]
    IntegerOutOfRange(String),

    #[error("Only single-document YAML files are supported")]
    MultipleDocuments,

    #[error("Alias refers to an unknown anchor")]
    UndefinedAlias,

    #[error("YAML event stream ended inside a node")]
    UnexpectedEnd,

    /// The compacted text does not parse back to the original document
    #[error("Compacted YAML does not re-parse to the original document")]
    RoundTripMismatch,
}

/// Knobs for the YAML compactor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlOptions {
    /// Resolve and write under this version, replacing any `%YAML` preamble
    pub version: Option<YamlVersion>,
    /// Quote every string a YAML 1.1 reader would take as a boolean
    pub quote_booleans: bool,
}

/// Compact a YAML document.
///
/// # Examples
///
/// ```
/// use uniminify::minifier::yaml::compact;
///
/// let out = compact("foo:\n  key: value\nbar:\n  key2: value2\n").unwrap();
/// assert_eq!(out, "foo: {key: value}\nbar: {key2: value2}\n");
///
/// assert_eq!(compact("%YAML 1.1\n---\nflag: Yes\n").unwrap(), "%YAML 1.1\n---\nflag: y\n");
/// ```
pub fn compact(source: &str) -> Result<String, YamlError> {
    compact_with(source, YamlOptions::default())
}

/// Compact a YAML document with explicit options.
///
/// # Examples
///
/// ```
/// use uniminify::minifier::yaml::{compact_with, YamlOptions, YamlVersion};
///
/// let forced = YamlOptions {
///     version: Some(YamlVersion::V1_1),
///     ..Default::default()
/// };
/// assert_eq!(compact_with("debug: off\n", forced).unwrap(), "%YAML 1.1\n---\ndebug: n\n");
///
/// let quoting = YamlOptions {
///     quote_booleans: true,
///     ..Default::default()
/// };
/// assert_eq!(compact_with("debug: off\n", quoting).unwrap(), "debug: \"off\"\n");
/// ```
pub fn compact_with(source: &str, options: YamlOptions) -> Result<String, YamlError> {
    let doc = parse_document_as(source, options.version)?;
    let output = render_document_with(&doc, options.quote_booleans);

    let reparsed = parse_document(&output).map_err(|_| YamlError::RoundTripMismatch)?;
    if reparsed.root != doc.root || reparsed.version != doc.version {
        return Err(YamlError::RoundTripMismatch);
    }
    Ok(output)
}

/// In-process minifier for `.yaml` / `.yml` files
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlMinifier {
    options: YamlOptions,
}

impl YamlMinifier {
    pub fn new(options: YamlOptions) -> Self {
        Self { options }
    }

    fn compact_file<FS: FileSystem>(&self, path: &Path, fs: &FS) -> Result<(), PipelineError> {
        let source = fs.read_to_string(path)?;
        let output = compact_with(&source, self.options)?;
        if output != source {
            fs.write_atomic(path, output)?;
        }
        Ok(())
    }
}

impl Minifier for YamlMinifier {
    fn minify<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> MinifyOutcome {
        self.compact_file(&task.path, fs).into()
    }
}
