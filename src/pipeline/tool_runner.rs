//! Execution of external minifiers
//!
//! Handles execution of individual tools: minify-xml, svgo, terser,
//! pyminifier and the shell mask scripts.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::config::Preset;
use crate::infra::{CommandExecutor, RealCommandExecutor};
use crate::tools::{ToolKind, ToolPaths};

use super::error::PipelineError;

/// Executes individual minification tools
pub struct ToolRunner<CE: CommandExecutor = RealCommandExecutor> {
    paths: ToolPaths,
    terser_config: Option<PathBuf>,
    cmd_executor: CE,
}

impl ToolRunner<RealCommandExecutor> {
    /// Create a tool runner that spawns real processes
    pub fn new(paths: ToolPaths) -> Self {
        Self::with_executor(paths, RealCommandExecutor)
    }
}

impl<CE: CommandExecutor> ToolRunner<CE> {
    /// Create a tool runner with a custom command executor
    pub fn with_executor(paths: ToolPaths, cmd_executor: CE) -> Self {
        Self {
            paths,
            terser_config: None,
            cmd_executor,
        }
    }

    /// Pass a config file to every terser invocation
    pub fn with_terser_config(mut self, terser_config: Option<PathBuf>) -> Self {
        self.terser_config = terser_config;
        self
    }

    /// Resolve a tool, run it, and fail on a non-zero exit status
    ///
    /// The captured output (stdout followed by stderr) becomes the
    /// diagnostic of [`PipelineError::ToolFailed`].
    pub fn run<F>(&self, kind: ToolKind, builder: F) -> Result<Output, PipelineError>
    where
        F: FnOnce(&mut Command) -> &mut Command,
    {
        let program = self.paths.resolve(kind)?;

        let mut cmd = Command::new(&program);
        builder(&mut cmd);
        let command = describe(&cmd);
        log::debug!("Running {command}");

        let output = self.cmd_executor.output(&mut cmd)?;
        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            if combined.trim().is_empty() {
                combined = "<empty>".to_string();
            }
            return Err(PipelineError::ToolFailed {
                command,
                code: output.status.code().unwrap_or(-1),
                output: combined,
            });
        }

        Ok(output)
    }

    /// Run minify-xml in place
    pub fn minify_xml(&self, file: &Path, preset: Preset) -> Result<(), PipelineError> {
        let extra: &[&str] = match preset {
            Preset::Safe => &[],
            Preset::Default => &["--collapse-whitespace-in-texts"],
            Preset::Brute => &["--trim-whitespace-from-texts"],
        };

        self.run(ToolKind::MinifyXml, |cmd| {
            cmd.arg(file).arg("--in-place").args(extra)
        })?;
        Ok(())
    }

    /// Run svgo, writing back to the same file
    pub fn svgo(&self, file: &Path, preset: Preset) -> Result<(), PipelineError> {
        self.run(ToolKind::Svgo, |cmd| {
            cmd.arg(file).arg("--output").arg(file);
            if preset == Preset::Brute {
                cmd.arg("--multipass");
            }
            cmd
        })?;
        Ok(())
    }

    /// Run terser without renaming top-level symbols
    pub fn terser(&self, file: &Path, preset: Preset) -> Result<(), PipelineError> {
        let terser_config = self.terser_config.as_deref();

        self.run(ToolKind::Terser, |cmd| {
            cmd.arg("--no-rename").arg(file).arg("--output").arg(file);
            if preset != Preset::Safe {
                cmd.arg("--compress");
            }
            if preset == Preset::Brute {
                cmd.arg("--mangle");
            }
            if let Some(config) = terser_config {
                cmd.arg("--config-file").arg(config);
            }
            cmd
        })?;
        Ok(())
    }

    /// Run pyminifier in place
    pub fn pyminifier(&self, file: &Path, preset: Preset) -> Result<(), PipelineError> {
        let mut outfile = std::ffi::OsString::from("--outfile=");
        outfile.push(file);

        self.run(ToolKind::Pyminifier, |cmd| {
            cmd.env("PYTHONDONTWRITEBYTECODE", "1").arg("--use-tabs");
            if preset == Preset::Brute {
                cmd.arg("--nonlatin");
            }
            cmd.arg(&outfile).arg(file)
        })?;
        Ok(())
    }

    /// Run a shell mask script and return its stdout
    pub fn shell_mask(
        &self,
        interpreter: ToolKind,
        script: ToolKind,
        file: &Path,
    ) -> Result<String, PipelineError> {
        let script_path = self.paths.resolve(script)?;

        let output = self.run(interpreter, |cmd| cmd.arg(&script_path).arg(file))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Render a command line for logs and diagnostics
fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
