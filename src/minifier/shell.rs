//! Shell script minification
//!
//! The heavy lifting is done by an external mask script run through bash or
//! zsh; shebang handling and output framing happen here.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::{Minifier, MinifyOutcome};
use crate::infra::{CommandExecutor, FileSystem};
use crate::pipeline::dispatch::FileTask;
use crate::pipeline::error::PipelineError;
use crate::pipeline::tool_runner::ToolRunner;
use crate::tools::ToolKind;

fn shebang_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#!\S+) +").expect("shebang regex is valid"))
}

/// Collapse the run of spaces after the interpreter path
///
/// ```
/// use uniminify::minifier::shell::normalize_shebang;
///
/// assert_eq!(normalize_shebang("#!/bin/bash  -e "), "#!/bin/bash -e");
/// assert_eq!(normalize_shebang("#!/bin/sh"), "#!/bin/sh");
/// ```
pub fn normalize_shebang(line: &str) -> String {
    shebang_regex().replace(line.trim(), "$1 ").into_owned()
}

/// Pick the interpreter and mask script for a shell file
pub(crate) fn mask_tools(path: &Path) -> (ToolKind, ToolKind) {
    let is_zsh = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zsh"));
    if is_zsh {
        (ToolKind::Zsh, ToolKind::ZshMaskScript)
    } else {
        (ToolKind::Bash, ToolKind::BashMaskScript)
    }
}

/// Strip the mask script's framing: the first two lines and the last one
fn frame_output(stdout: &str, shebang: Option<&str>) -> String {
    let lines: Vec<&str> = stdout.split('\n').collect();
    let body: &[&str] = if lines.len() < 3 {
        &[]
    } else {
        &lines[2..lines.len() - 1]
    };

    let body = body
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    match shebang {
        Some(shebang) => format!("{shebang}\n{body}"),
        None => body,
    }
}

pub struct ShellMinifier<'a, CE: CommandExecutor> {
    runner: &'a ToolRunner<CE>,
}

impl<'a, CE: CommandExecutor> ShellMinifier<'a, CE> {
    pub fn new(runner: &'a ToolRunner<CE>) -> Self {
        Self { runner }
    }

    fn run<FS: FileSystem>(&self, path: &Path, fs: &FS) -> Result<(), PipelineError> {
        let source = fs.read_to_string(path)?;
        if source.is_empty() {
            return Ok(());
        }

        let shebang = source
            .lines()
            .next()
            .filter(|first| first.starts_with("#!"))
            .map(normalize_shebang);

        if let Some(shebang) = &shebang {
            let rest_blank = source.lines().skip(1).all(|line| line.trim().is_empty());
            if rest_blank {
                if *shebang != source {
                    fs.write_atomic(path, shebang)?;
                }
                return Ok(());
            }
        }

        let (interpreter, script) = mask_tools(path);
        let stdout = self.runner.shell_mask(interpreter, script, path)?;
        let minified = frame_output(&stdout, shebang.as_deref());

        fs.write_atomic(path, minified)?;
        Ok(())
    }
}

impl<CE: CommandExecutor> Minifier for ShellMinifier<'_, CE> {
    fn minify<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> MinifyOutcome {
        self.run(&task.path, fs).into()
    }
}
