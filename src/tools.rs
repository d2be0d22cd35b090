//! Tool resolution and availability checks
//!
//! External minifiers are located through [`ToolPaths`]: a path configured in
//! `.uniminify.toml` wins, otherwise the tool is looked up on `PATH`.
//! - minify-xml (XML)
//! - svgo (SVG)
//! - terser (JavaScript)
//! - pyminifier (Python)
//! - bash / zsh plus their mask scripts (shell)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use console::style;
use thiserror::Error;

use crate::fmt::{emoji, BULB, CHECKMARK, CROSSMARK, WARNING, WRENCH};
use crate::infra::{CommandExecutor, RealCommandExecutor};

/// Errors that can occur during tool operations
#[derive(Error, Debug)]
pub enum ToolError {
    /// I/O error during tool execution
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool is neither configured nor on PATH
    #[error("Required tool missing: {0}")]
    MissingTool(String),

    /// Configured path does not point at a file
    #[error("Configured path for {tool} is not an executable file: {}", path.display())]
    NotExecutable { tool: String, path: PathBuf },
}

/// Every external program uniminify can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    MinifyXml,
    Svgo,
    Terser,
    Pyminifier,
    Bash,
    Zsh,
    /// Mask script fed to bash for `.sh` / `.bash`
    BashMaskScript,
    /// Mask script fed to zsh for `.zsh`
    ZshMaskScript,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::MinifyXml,
        ToolKind::Svgo,
        ToolKind::Terser,
        ToolKind::Pyminifier,
        ToolKind::Bash,
        ToolKind::Zsh,
        ToolKind::BashMaskScript,
        ToolKind::ZshMaskScript,
    ];

    /// Name used in the `[tools]` table and for the PATH lookup
    pub fn name(&self) -> &'static str {
        match self {
            Self::MinifyXml => "minify-xml",
            Self::Svgo => "svgo",
            Self::Terser => "terser",
            Self::Pyminifier => "pyminifier",
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::BashMaskScript => "minify-bash-script",
            Self::ZshMaskScript => "minify-zsh-script",
        }
    }

    /// Look a tool up by its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Mask scripts are run through an interpreter and have no `--version`
    pub fn is_script(&self) -> bool {
        matches!(self, Self::BashMaskScript | Self::ZshMaskScript)
    }

    /// How to get the tool onto the machine
    pub fn install_hint(&self) -> &'static str {
        match self {
            Self::MinifyXml => "npm install --global minify-xml",
            Self::Svgo => "npm install --global svgo",
            Self::Terser => "npm install --global terser",
            Self::Pyminifier => "pip install pyminifier",
            Self::Bash => "install bash with your system package manager",
            Self::Zsh => "install zsh with your system package manager",
            Self::BashMaskScript | Self::ZshMaskScript => {
                "set its location in the [tools] table of .uniminify.toml"
            }
        }
    }
}

/// Tool name to executable mapping
///
/// # Examples
///
/// ```
/// use uniminify::tools::{ToolKind, ToolPaths};
///
/// let paths = ToolPaths::new().with_path(ToolKind::Terser, "/opt/node/bin/terser");
/// assert!(paths.configured(ToolKind::Terser).is_some());
/// assert!(paths.configured(ToolKind::Svgo).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
    configured: BTreeMap<ToolKind, PathBuf>,
}

impl ToolPaths {
    /// Create an empty mapping where every tool comes from PATH
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a tool to an explicit location
    pub fn with_path(mut self, kind: ToolKind, path: impl Into<PathBuf>) -> Self {
        self.configured.insert(kind, path.into());
        self
    }

    /// Get the configured location of a tool, if any
    pub fn configured(&self, kind: ToolKind) -> Option<&Path> {
        self.configured.get(&kind).map(PathBuf::as_path)
    }

    /// Resolve a tool to the file that will be executed
    ///
    /// # Errors
    /// Returns [`ToolError::NotExecutable`] when the configured path is not a
    /// file, and [`ToolError::MissingTool`] when the tool is not configured and
    /// not on PATH.
    pub fn resolve(&self, kind: ToolKind) -> Result<PathBuf, ToolError> {
        if let Some(path) = self.configured(kind) {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(ToolError::NotExecutable {
                tool: kind.name().to_string(),
                path: path.to_path_buf(),
            });
        }

        which::which(kind.name()).map_err(|_| ToolError::MissingTool(kind.name().to_string()))
    }
}

/// Status of a tool check
#[derive(Debug)]
pub enum ToolStatus {
    /// Tool resolved; version is the first line of `--version` when known
    Available { path: PathBuf, version: Option<String> },
    /// Configured location is unusable
    Broken(String),
    /// Tool binary not found
    Missing,
}

/// Checks which external minifiers are usable
pub struct ToolChecker<'a, CE: CommandExecutor = RealCommandExecutor> {
    paths: &'a ToolPaths,
    cmd_executor: CE,
}

impl<'a> ToolChecker<'a, RealCommandExecutor> {
    /// Create a checker with real command execution
    pub fn new(paths: &'a ToolPaths) -> Self {
        Self::with_executor(paths, RealCommandExecutor)
    }
}

impl<'a, CE: CommandExecutor> ToolChecker<'a, CE> {
    /// Create a checker with a custom command executor
    pub fn with_executor(paths: &'a ToolPaths, cmd_executor: CE) -> Self {
        Self {
            paths,
            cmd_executor,
        }
    }

    /// Get the version string of a resolved tool
    fn version(&self, path: &Path) -> Option<String> {
        let output = self
            .cmd_executor
            .execute(|cmd| cmd.arg("--version"), path)
            .ok()?;

        if !output.status.success() {
            return None;
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }

    /// Check a single tool
    pub fn check(&self, kind: ToolKind) -> ToolStatus {
        match self.paths.resolve(kind) {
            Ok(path) => {
                let version = if kind.is_script() {
                    None
                } else {
                    self.version(&path)
                };
                ToolStatus::Available { path, version }
            }
            Err(ToolError::MissingTool(_)) => ToolStatus::Missing,
            Err(e) => ToolStatus::Broken(e.to_string()),
        }
    }

    /// Check every tool, in [`ToolKind::ALL`] order
    pub fn check_all(&self) -> Vec<(ToolKind, ToolStatus)> {
        ToolKind::ALL
            .into_iter()
            .map(|kind| (kind, self.check(kind)))
            .collect()
    }
}

/// Print a tool report to stdout
pub fn print_tool_report(report: &[(ToolKind, ToolStatus)]) {
    println!("\n{} External minifiers:", emoji(WRENCH));

    let mut missing: Vec<ToolKind> = Vec::new();
    for (kind, status) in report {
        match status {
            ToolStatus::Available { path, version } => {
                println!(
                    "   {} {} - {}",
                    emoji(CHECKMARK),
                    style(kind.name()).bold(),
                    style(version.as_deref().unwrap_or("(version unknown)")).dim()
                );
                println!("     {}", style(path.display()).dim());
            }
            ToolStatus::Broken(reason) => {
                println!(
                    "   {} {} - {}",
                    emoji(CROSSMARK),
                    style(kind.name()).bold(),
                    style(reason).red()
                );
            }
            ToolStatus::Missing => {
                println!(
                    "   {} {} - {}",
                    emoji(WARNING),
                    style(kind.name()).bold(),
                    style("NOT FOUND").yellow()
                );
                missing.push(*kind);
            }
        }
    }

    if !missing.is_empty() {
        println!(
            "\n{} Files needing missing tools will fail and stay untouched.",
            emoji(BULB)
        );
        for kind in missing {
            println!("   • {}: {}", kind.name(), kind.install_hint());
        }
    }
}
