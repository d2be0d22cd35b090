//! Configuration file data structures

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use super::preset::{Preset, YamlVersionChoice};
use crate::tools::{ToolKind, ToolPaths};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".uniminify.toml";

/// uniminify configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Global preset
    pub preset: Option<Preset>,

    /// Preset for JavaScript files
    pub js_preset: Option<Preset>,

    /// Preset for XML and SVG files
    pub xml_preset: Option<Preset>,

    /// YAML version forced on every YAML file
    pub yaml_version: Option<YamlVersionChoice>,

    /// Quote every YAML string a 1.1 reader would take as a boolean
    pub yaml_always_quote_booleans: Option<bool>,

    /// Number of files minified in parallel
    pub jobs: Option<usize>,

    /// Config file handed to terser as `--config-file`
    pub terser_config: Option<PathBuf>,

    /// Tool name to executable path
    #[serde(default)]
    pub tools: BTreeMap<String, PathBuf>,
}

impl ConfigFile {
    /// Validate values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            anyhow::bail!("jobs must be at least 1");
        }

        let unknown: Vec<&str> = self
            .tools
            .keys()
            .map(String::as_str)
            .filter(|name| ToolKind::from_name(name).is_none())
            .collect();
        if !unknown.is_empty() {
            let known: Vec<&str> = ToolKind::ALL.iter().map(|kind| kind.name()).collect();
            anyhow::bail!(
                "Unknown tool(s) in [tools]: {} (known tools: {})",
                unknown.join(", "),
                known.join(", ")
            );
        }

        Ok(())
    }

    /// Make relative paths relative to the directory holding the config file
    pub fn resolve_relative_paths(&mut self, base_dir: &Path) {
        let absolutize = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        };

        if let Some(path) = self.terser_config.as_mut() {
            absolutize(path);
        }
        self.tools.values_mut().for_each(absolutize);
    }

    /// Build the tool mapping; names must already be validated
    pub fn tool_paths(&self) -> ToolPaths {
        self.tools
            .iter()
            .filter_map(|(name, path)| ToolKind::from_name(name).map(|kind| (kind, path)))
            .fold(ToolPaths::new(), |paths, (kind, path)| {
                paths.with_path(kind, path.clone())
            })
    }
}
