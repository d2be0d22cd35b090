//! Adapters for external minifiers
//!
//! XML goes to minify-xml, SVG to svgo, JavaScript to terser and Python to
//! pyminifier. Each tool rewrites the file in place.

use std::path::Path;

use super::{Minifier, MinifyOutcome};
use crate::config::Preset;
use crate::infra::{CommandExecutor, FileSystem};
use crate::pipeline::dispatch::{FileTask, FileType};
use crate::pipeline::error::PipelineError;
use crate::pipeline::tool_runner::ToolRunner;

/// Runs the external tool matching a task's file type
pub struct ExternalMinifier<'a, CE: CommandExecutor> {
    runner: &'a ToolRunner<CE>,
}

impl<'a, CE: CommandExecutor> ExternalMinifier<'a, CE> {
    pub fn new(runner: &'a ToolRunner<CE>) -> Self {
        Self { runner }
    }

    fn run<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> Result<(), PipelineError> {
        let path = task.path.as_path();
        match task.file_type {
            FileType::Xml => self.runner.minify_xml(path, task.preset),
            FileType::Svg => self.runner.svgo(path, task.preset),
            FileType::JavaScript => self.runner.terser(path, task.preset),
            FileType::Python => self.python(path, task.preset, fs),
            other => Err(PipelineError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{other} files are not handled by an external tool"),
            ))),
        }
    }

    fn python<FS: FileSystem>(
        &self,
        path: &Path,
        preset: Preset,
        fs: &FS,
    ) -> Result<(), PipelineError> {
        self.runner.pyminifier(path, preset)?;

        let minified = fs.read_to_string(path)?;
        let tidied = tidy_python(&minified);
        if tidied != minified {
            fs.write_atomic(path, tidied)?;
        }
        Ok(())
    }
}

impl<CE: CommandExecutor> Minifier for ExternalMinifier<'_, CE> {
    fn minify<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> MinifyOutcome {
        self.run(task, fs).into()
    }
}

/// Clean up pyminifier output.
///
/// CRLF becomes LF, the trailing comment line pyminifier appends is dropped,
/// and trailing newlines are stripped.
///
/// ```
/// use uniminify::minifier::external::tidy_python;
///
/// assert_eq!(tidy_python("x=1\r\n# Created by pyminifier\n"), "x=1");
/// assert_eq!(tidy_python("print()\n"), "print()");
/// ```
pub fn tidy_python(source: &str) -> String {
    let text = source.replace("\r\n", "\n");
    let text = strip_trailing_comment_line(&text);
    text.trim_end_matches(['\n', '\r']).to_string()
}

fn strip_trailing_comment_line(text: &str) -> &str {
    let Some(body) = text.strip_suffix('\n') else {
        return text;
    };
    let line_start = body.rfind('\n').map_or(0, |i| i + 1);
    let last_line = body[line_start..].trim_start();
    if last_line.len() > 1 && last_line.starts_with('#') {
        &text[..line_start]
    } else {
        text
    }
}
