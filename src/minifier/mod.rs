//! Minifiers for every supported file type
//!
//! YAML, plain text and Markdown are compacted in process. XML, SVG,
//! JavaScript and Python are handed to external tools; shell scripts use an
//! external mask script with in-process framing around it.
//!
//! Every minifier rewrites the file in place and reports a [`MinifyOutcome`];
//! the guard decides whether the result is kept.

pub mod external;
pub mod newline;
pub mod shell;
pub mod text;
pub mod yaml;

use crate::infra::{CommandExecutor, FileSystem, RealCommandExecutor};
use crate::pipeline::dispatch::{FileTask, FileType};
use crate::pipeline::error::PipelineError;
use crate::pipeline::tool_runner::ToolRunner;
use crate::tools::ToolKind;

use external::ExternalMinifier;
use shell::ShellMinifier;
use text::{TextFlavor, TextMinifier};
use yaml::{YamlMinifier, YamlOptions};

/// Result of one minifier run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifyOutcome {
    pub success: bool,
    /// Tool output or error message; empty on success
    pub diagnostic: String,
}

impl MinifyOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            diagnostic: String::new(),
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            diagnostic: diagnostic.into(),
        }
    }
}

impl From<Result<(), PipelineError>> for MinifyOutcome {
    fn from(result: Result<(), PipelineError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// A file minifier: path and preset in, outcome out
pub trait Minifier {
    /// Minify `task.path` in place through `fs`
    fn minify<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> MinifyOutcome;
}

/// External tools a task cannot be minified without
pub fn required_tools(task: &FileTask) -> Vec<ToolKind> {
    match task.file_type {
        FileType::Xml => vec![ToolKind::MinifyXml],
        FileType::Svg => vec![ToolKind::Svgo],
        FileType::JavaScript => vec![ToolKind::Terser],
        FileType::Python => vec![ToolKind::Pyminifier],
        FileType::Shell => {
            let (interpreter, script) = shell::mask_tools(&task.path);
            vec![interpreter, script]
        }
        FileType::Yaml | FileType::Text | FileType::Markdown | FileType::Unsupported => vec![],
    }
}

/// All minifiers, selected by file type
pub struct MinifierSet<CE: CommandExecutor = RealCommandExecutor> {
    runner: ToolRunner<CE>,
    yaml: YamlMinifier,
}

impl<CE: CommandExecutor> MinifierSet<CE> {
    pub fn new(runner: ToolRunner<CE>) -> Self {
        Self {
            runner,
            yaml: YamlMinifier::default(),
        }
    }

    /// Use the given YAML version and quoting options
    pub fn with_yaml_options(mut self, options: YamlOptions) -> Self {
        self.yaml = YamlMinifier::new(options);
        self
    }
}

impl<CE: CommandExecutor> Minifier for MinifierSet<CE> {
    fn minify<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> MinifyOutcome {
        match task.file_type {
            FileType::Yaml => self.yaml.minify(task, fs),
            FileType::Text => TextMinifier::new(TextFlavor::Plain).minify(task, fs),
            FileType::Markdown => TextMinifier::new(TextFlavor::Markdown).minify(task, fs),
            FileType::Xml | FileType::Svg | FileType::JavaScript | FileType::Python => {
                ExternalMinifier::new(&self.runner).minify(task, fs)
            }
            FileType::Shell => ShellMinifier::new(&self.runner).minify(task, fs),
            FileType::Unsupported => MinifyOutcome::failed(format!(
                "No minifier for {}",
                task.path.display()
            )),
        }
    }
}
